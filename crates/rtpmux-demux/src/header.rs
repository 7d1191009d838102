//! RTCP 定长头部的只读视图。
//!
//! # 教案定位（Why）
//! - RFC 3550 §6.4.1 规定每个 RTCP 子报文以 4 字节定长头开始；分流判定只依赖该头部
//!   与链式长度一致性，因此单独建模为零拷贝视图。
//! - 原型实现使用 C 位域加 `packed` 属性并按宿主端序排列字段；此处改为显式移位与
//!   掩码，消除对编译器布局和平台端序的依赖，只保留线上字节序（大端）这一个事实。
//!
//! # 契约说明（What）
//! - [`RtcpHeaderView::parse`] 仅读取输入切片的前 4 字节，不持有引用、不复制其余
//!   数据；长度不足时返回 `None` 而非 panic。
//! - `length_words` 的语义为「头部之后的 32-bit 字数减一」，即报文总字节数等于
//!   `(length_words + 1) * 4`，由 [`RtcpHeaderView::packet_len`] 统一换算。

/// RTP/RTCP 共用的固定版本号（RFC 3550）。
pub const RTCP_VERSION: u8 = 2;

/// RTCP 定长头部长度（字节）。
pub const RTCP_HEADER_LEN: usize = 4;

/// RTCP 定长头部的结构化表示。
///
/// ### Why
/// - 分类器与填充归一化都需要读取版本号、填充标志与长度字段，集中一次拆解避免
///   散落的位运算。
///
/// ### What
/// - `version`：2 bit 版本号，现行规范固定为 2；
/// - `padding`：1 bit 填充标志，指示报文末尾是否附带填充字节；
/// - `report_count`：5 bit 计数字段，语义随报文类型变化（SR/RR 的报告块数等）；
/// - `payload_type`：完整的类型字节（RTCP 类型空间 200-204 及注册扩展）；
/// - `length_words`：16 bit 大端长度字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcpHeaderView {
    /// 版本号（2 bit）。
    pub version: u8,
    /// 填充标志（1 bit）。
    pub padding: bool,
    /// 计数字段（5 bit），语义依报文类型而定。
    pub report_count: u8,
    /// 报文类型字节。
    pub payload_type: u8,
    /// 长度字段（32-bit 字数减一，大端）。
    pub length_words: u16,
}

impl RtcpHeaderView {
    /// 从切片前 4 字节解析头部视图；长度不足返回 `None`。
    ///
    /// - **前置条件**：无，任意切片均可安全传入。
    /// - **后置条件**：返回 `Some` 时字段均已按线上布局拆解完毕，原切片未被修改。
    #[must_use]
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < RTCP_HEADER_LEN {
            return None;
        }
        Some(Self::from_prefix([buf[0], buf[1], buf[2], buf[3]]))
    }

    /// 从已就位的 4 字节前缀拆解头部，供调用方在边界已验证时使用。
    #[must_use]
    pub const fn from_prefix(prefix: [u8; 4]) -> Self {
        Self {
            version: prefix[0] >> 6,
            padding: (prefix[0] & 0b0010_0000) != 0,
            report_count: prefix[0] & 0x1f,
            payload_type: prefix[1],
            length_words: u16::from_be_bytes([prefix[2], prefix[3]]),
        }
    }

    /// 按长度字段换算报文总字节数（含头部与可能的填充）。
    ///
    /// 结果恒为 4 的倍数且不小于 [`RTCP_HEADER_LEN`]，`usize` 运算不会溢出
    /// （`length_words` 至多 65535）。
    #[must_use]
    pub const fn packet_len(&self) -> usize {
        (self.length_words as usize + 1) * 4
    }
}
