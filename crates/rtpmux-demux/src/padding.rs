//! RTCP 尾部填充归一化。
//!
//! # 教案定位（Why）
//! - 加密或对齐需求会让发送端在 RTCP 报文末尾追加填充字节（RFC 3550 §6.4.1：
//!   最后一个字节记录含自身在内的填充总数）；下游解码器期望看到无填充的报文。
//! - 归一化只计算「逻辑长度」，从不改写字节——调用方按返回值对原缓冲切片即可。
//!
//! # 契约说明（What）
//! - 填充元数据同样来自攻击者可控的网络数据：声明值为 0 或吞掉头部时视为不可信，
//!   保守地返回原长度（宁可不剥离也不破坏报文）。

use crate::header::{RTCP_HEADER_LEN, RtcpHeaderView};

/// 计算已知带填充的 RTCP 报文的有效长度。
///
/// # 调用契约（What）
/// - **前置条件**：调用方已通过分类器（或等价外部知识）确认 `buf` 是单个 RTCP
///   报文或链内最后一个元素，且头部填充标志置位、`buf.len() >= 4`。
/// - **返回值**：剥离填充后的字节数；填充计数不可信（`p < 1` 或 `p > len - 4`）
///   时返回原长度，不信任任何一个字节的剥离。
/// - **后置条件**：不修改缓冲、不保留引用。
#[must_use]
pub fn effective_length(buf: &[u8]) -> usize {
    let len = buf.len();
    if len < RTCP_HEADER_LEN {
        return len;
    }

    let pad = buf[len - 1] as usize;
    if pad < 1 || pad > len - RTCP_HEADER_LEN {
        return len;
    }
    len - pad
}

/// 返回剥离尾部填充后的报文切片。
///
/// 与 [`effective_length`] 不同，本函数自行检查头部填充标志：标志未置位或头部
/// 无法解析时原样返回，可安全作用于任意单个报文。
#[must_use]
pub fn without_padding(buf: &[u8]) -> &[u8] {
    match RtcpHeaderView::parse(buf) {
        Some(header) if header.padding => &buf[..effective_length(buf)],
        _ => buf,
    }
}
