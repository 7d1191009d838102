#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rtpmux_demux::{RtcpTypeSpace, classify, collect_chain, is_rtcp, without_padding};

/// Fuzz 用例：任意数据报字节加一组可选的扩展类型。
///
/// - **Why**：分类器的安全性质（有界终止、无越界、无 panic）必须对任意输入成立，
///   与类型空间的具体协商结果无关；把扩展类型纳入用例可同时探索空间边界。
/// - **How**：`extensions` 直接按字节累加进 [`RtcpTypeSpace`]，低于 192 的取值
///   会被集合静默忽略，恰好覆盖该契约分支。
#[derive(Debug, Arbitrary)]
struct DemuxCase {
    bytes: Vec<u8>,
    extensions: Vec<u8>,
}

fuzz_target!(|case: DemuxCase| {
    let mut space = RtcpTypeSpace::core();
    for pt in &case.extensions {
        space = space.with(*pt);
    }

    // === Why === 布尔入口与结构化入口必须对同一输入给出一致判定，
    // 且 sink 触发次数等于报告的链元素数。
    let mut calls = 0usize;
    let mut sink = |_pt: u8, _len: usize| calls += 1;
    let verdict = is_rtcp(&case.bytes, &space, Some(&mut sink));
    let outcome = classify(&case.bytes, &space, None);
    assert_eq!(verdict, outcome.is_ok());
    if let Ok(elements) = outcome {
        assert_eq!(calls, elements);
    }

    // 幂等：重复调用产生完全相同的判定。
    assert_eq!(verdict, is_rtcp(&case.bytes, &space, None));

    // 链收集与填充归一化在接受路径上的一致性：
    // 元素区间两两相接铺满数据报，剥离填充只会缩短且保留头部。
    if let Ok(chain) = collect_chain(&case.bytes, &space) {
        let mut offset = 0usize;
        for element in &chain {
            assert_eq!(element.offset, offset);
            let bytes = element
                .slice(&case.bytes)
                .expect("链元素区间必须落在数据报内");
            let stripped = without_padding(bytes);
            assert!(stripped.len() <= bytes.len());
            assert!(stripped.len() >= 4);
            offset += element.len;
        }
        assert_eq!(offset, case.bytes.len());
    }
});
