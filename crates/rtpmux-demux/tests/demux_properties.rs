//! 分流核心的性质验证（Proptest）。
//!
//! # 教案级注释概览
//! - **核心目标 (Why)**：分类器面对的是攻击者可控的网络字节，必须对*任意*输入
//!   有界终止、绝不越界、绝不 panic，且判定可重复；对合法构造的链则必须接受并
//!   给出恰好铺满数据报的诊断序列。性质测试直接约束这些契约，防止实现重构时
//!   遗漏边界检查。
//! - **设计手法 (Why)**：两个方向的生成器——完全随机的字节串验证「安全/稳定」
//!   性质；按 RFC 3550 布局组装的合法链验证「接受/铺满」性质。后者即分类器的
//!   影子构造器：生成器与实现若对格式理解不一致，性质会立刻失败。
//!
//! # 合同与边界 (What)
//! - 任意字节串：`is_rtcp` 与 `classify` 判定一致；两次调用结果与 sink 序列
//!   完全相同；sink 触发次数等于 `classify` 报告的元素数（接受时）。
//! - 合法链：判定为真，sink 序列长度等于元素个数，长度之和等于缓冲长度且每项
//!   为 4 的倍数。
//! - 填充归一化：返回值恒不大于原长度，且不小于 4（输入长度足够时），对任意
//!   输入不得 panic。

use proptest::prelude::*;
use rtpmux_demux::{RtcpTypeSpace, classify, collect_chain, effective_length, is_rtcp};

/// 单个合法链元素的规格：核心类型 + 报文体字数 + 可选 4/8 字节填充。
#[derive(Debug, Clone, Copy)]
struct ElementSpec {
    payload_type: u8,
    payload_words: usize,
    pad: Option<u8>,
}

fn element_spec() -> impl Strategy<Value = ElementSpec> {
    (
        prop::sample::select(&[200u8, 201, 202, 203, 204][..]),
        0usize..6,
        prop::option::of(prop::sample::select(&[4u8, 8][..])),
    )
        .prop_map(|(payload_type, payload_words, pad)| ElementSpec {
            payload_type,
            payload_words,
            pad,
        })
}

/// 按规格组装线上字节，与生产代码共享的唯一事实是 RFC 3550 的字节布局。
fn encode_element(spec: &ElementSpec, out: &mut Vec<u8>) {
    let pad_len = spec.pad.map_or(0, |p| p as usize);
    let total = 4 + spec.payload_words * 4 + pad_len;
    out.push(0x80 | if spec.pad.is_some() { 0x20 } else { 0 });
    out.push(spec.payload_type);
    out.extend_from_slice(&((total / 4 - 1) as u16).to_be_bytes());
    out.extend(std::iter::repeat_n(0x5a, spec.payload_words * 4));
    if let Some(p) = spec.pad {
        out.extend(std::iter::repeat_n(0x00, pad_len - 1));
        out.push(p);
    }
}

fn valid_chain() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(element_spec(), 1..5).prop_map(|specs| {
        let mut buf = Vec::new();
        for spec in &specs {
            encode_element(spec, &mut buf);
        }
        buf
    })
}

proptest! {
    /// 任意字节串：有界终止、无 panic、两个入口判定一致、sink 计数与元素数吻合。
    #[test]
    fn prop_arbitrary_bytes_are_classified_safely(
        bytes in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let space = RtcpTypeSpace::core();
        let mut calls = 0usize;
        let mut sink = |_pt: u8, _len: usize| calls += 1;

        let verdict = is_rtcp(&bytes, &space, Some(&mut sink));
        let outcome = classify(&bytes, &space, None);

        prop_assert_eq!(verdict, outcome.is_ok());
        if let Ok(elements) = outcome {
            prop_assert_eq!(calls, elements);
            prop_assert!(elements >= 1);
        }
    }

    /// 判定幂等：同一缓冲两次调用返回相同结果与相同诊断序列。
    #[test]
    fn prop_classification_is_idempotent(
        bytes in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let space = RtcpTypeSpace::core();

        let mut first = Vec::new();
        let mut sink1 = |pt: u8, len: usize| first.push((pt, len));
        let r1 = is_rtcp(&bytes, &space, Some(&mut sink1));

        let mut second = Vec::new();
        let mut sink2 = |pt: u8, len: usize| second.push((pt, len));
        let r2 = is_rtcp(&bytes, &space, Some(&mut sink2));

        prop_assert_eq!(r1, r2);
        prop_assert_eq!(first, second);
    }

    /// 合法链必须被接受，且诊断序列恰好铺满缓冲。
    #[test]
    fn prop_well_formed_chains_tile_exactly(buf in valid_chain()) {
        let space = RtcpTypeSpace::core();
        let mut seen = Vec::new();
        let mut sink = |pt: u8, len: usize| seen.push((pt, len));

        prop_assert!(is_rtcp(&buf, &space, Some(&mut sink)));
        prop_assert!(!seen.is_empty());
        prop_assert_eq!(seen.iter().map(|(_, len)| len).sum::<usize>(), buf.len());
        for (pt, len) in &seen {
            prop_assert!(space.contains(*pt));
            prop_assert!(*len >= 4 && *len % 4 == 0);
        }

        // 链收集与布尔判定对同一输入必须一致，偏移为长度前缀和。
        let chain = collect_chain(&buf, &space).expect("合法链应可收集");
        prop_assert_eq!(chain.len(), seen.len());
        let mut offset = 0usize;
        for (element, (pt, len)) in chain.iter().zip(&seen) {
            prop_assert_eq!(element.offset, offset);
            prop_assert_eq!(element.payload_type, *pt);
            prop_assert_eq!(element.len, *len);
            offset += len;
        }
    }

    /// 破坏合法链首部版本号后必须被否决。
    #[test]
    fn prop_version_corruption_disqualifies(buf in valid_chain(), version in 0u8..2) {
        let mut corrupted = buf;
        corrupted[0] = (corrupted[0] & 0x3f) | (version << 6);
        prop_assert!(!is_rtcp(&corrupted, &RtcpTypeSpace::core(), None));
    }

    /// 填充归一化对任意输入不 panic，返回值不超过原长度。
    #[test]
    fn prop_effective_length_is_bounded(
        bytes in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let shortened = effective_length(&bytes);
        prop_assert!(shortened <= bytes.len());
        if bytes.len() >= 4 {
            prop_assert!(shortened >= 4);
        } else {
            prop_assert_eq!(shortened, bytes.len());
        }
    }
}
