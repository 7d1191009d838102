//! RFC 5761 分流分类器：链式长度一致性校验。
//!
//! # 教案定位（Why）
//! - 单端口复用下，仅凭首字节无法稳妥区分 RTP 与 RTCP（两者版本号相同）；本模块
//!   结合类型字节与「声明长度必须恰好铺满整个数据报」的链式校验给出权威判定。
//! - 判定失败不是错误而是分类结果，因此对外主入口 [`is_rtcp`] 返回布尔值；
//!   [`classify`] 另行暴露教学式的 [`RejectReason`]，只服务于遥测与测试断言。
//!
//! # 实现策略（How）
//! - 游标从 0 出发，逐个读取 4 字节头部视图：版本号、声明长度、类型空间三重校验
//!   任一失败立即否决；通过校验的子报文先回调诊断 sink，再推进游标。
//! - 每次字段访问前都有边界检查；头部声明的长度再离谱也只会导致判定为「不是
//!   RTCP」，绝不会触发越界读取（输入是攻击者可控的网络数据）。
//!
//! # 风险提示（Trade-offs）
//! - 诊断 sink 在调用线程内同步执行，阻塞型 sink 会拖慢分类调用；核心不设超时，
//!   假定调用方提供快速回调。

use core::fmt;

use crate::{
    RtcpChainVec,
    header::{RTCP_HEADER_LEN, RTCP_VERSION, RtcpHeaderView},
    new_chain_vec,
    types::RtcpTypeSpace,
};

/// 链元素收集的默认内联容量。
pub const DEFAULT_CHAIN_CAPACITY: usize = 4;

/// 分类过程的诊断回调。
///
/// ### Why
/// - 代理/中继常需要在不解析报文体的前提下记录链内各子报文的类型与长度
///   （遥测、RR 镜像提取等），回调让调用方以零分配方式旁路这些信息。
///
/// ### Contract
/// - 每个成功通过校验的链元素触发一次 `on_packet`，顺序与链内顺序一致；
/// - 回调借用 `&mut self` 且仅在分类调用内同步触发，无法被存储逃逸；
/// - 回调的副作用不影响分类结果。
pub trait DemuxSink {
    /// 报告一个链元素的类型字节与总字节数（含头部与填充）。
    fn on_packet(&mut self, payload_type: u8, packet_len: usize);
}

impl<F: FnMut(u8, usize)> DemuxSink for F {
    fn on_packet(&mut self, payload_type: u8, packet_len: usize) {
        self(payload_type, packet_len);
    }
}

/// 数据报未通过 RTCP 判定的结构化原因。
///
/// ## 教案解读（Why）
/// - 布尔判定足够驱动分流，但排查协商偏差或上游实现缺陷时需要知道「在哪个偏移、
///   因为什么」被否决；每个分支对应算法中的一条校验规则。
///
/// ## 契约定义（What）
/// - 所有分支都表示「该数据报按 RTP 路径处理」，不携带可恢复语义；
/// - 变体实现 `Clone`/`PartialEq`，便于测试直接断言具体原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 数据报不足 4 字节，连一个 RTCP 头部都放不下。
    DatagramTooShort {
        /// 数据报实际长度。
        len: usize,
    },
    /// 某个链位置的版本号不是 2。
    BadVersion {
        /// 问题头部在数据报内的偏移。
        offset: usize,
        /// 实际读到的版本号。
        version: u8,
    },
    /// 某个链位置的类型字节不在协商的 RTCP 类型空间内。
    ForeignPayloadType {
        /// 问题头部在数据报内的偏移。
        offset: usize,
        /// 实际读到的类型字节。
        payload_type: u8,
    },
    /// 头部声明的报文长度超出数据报剩余字节。
    LengthOverrun {
        /// 问题头部在数据报内的偏移。
        offset: usize,
        /// 声明的报文字节数。
        declared: usize,
        /// 该位置实际剩余的字节数。
        available: usize,
    },
    /// 链元素未能恰好铺满数据报，末尾残留孤立字节。
    TrailingBytes {
        /// 最后一个合法链元素结束后的游标位置。
        offset: usize,
        /// 残留字节数（1-3）。
        leftover: usize,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatagramTooShort { len } => {
                write!(f, "数据报仅 {len} 字节，不足一个 RTCP 头部")
            }
            Self::BadVersion { offset, version } => {
                write!(f, "偏移 {offset} 处版本号 {version} 非法，期望值为 2")
            }
            Self::ForeignPayloadType {
                offset,
                payload_type,
            } => {
                write!(f, "偏移 {offset} 处类型 {payload_type} 不在 RTCP 类型空间内")
            }
            Self::LengthOverrun {
                offset,
                declared,
                available,
            } => {
                write!(
                    f,
                    "偏移 {offset} 处声明 {declared} 字节，但仅剩 {available} 字节"
                )
            }
            Self::TrailingBytes { offset, leftover } => {
                write!(f, "链在偏移 {offset} 结束后残留 {leftover} 字节")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RejectReason {}

/// 链内一个子报文的位置记录。
///
/// 仅保存偏移与元信息，不借用数据报本身；调用方用 [`ChainElement::slice`]
/// 从原始缓冲取回对应字节（原型中继以此提取 RR 子报文做镜像转发）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainElement {
    /// 子报文在数据报内的起始偏移。
    pub offset: usize,
    /// 类型字节。
    pub payload_type: u8,
    /// 子报文总字节数（含头部与填充）。
    pub len: usize,
    /// 头部填充标志。
    pub padding: bool,
}

impl ChainElement {
    /// 从收集时使用的同一数据报切出本元素的字节区间。
    ///
    /// 传入其他缓冲或已被截短的缓冲时返回 `None`，不会 panic。
    #[must_use]
    pub fn slice<'a>(&self, datagram: &'a [u8]) -> Option<&'a [u8]> {
        datagram.get(self.offset..self.offset + self.len)
    }
}

/// 对数据报执行 RTCP 链式校验，返回链元素数量或否决原因。
///
/// # 设计动机（Why）
/// - [`is_rtcp`] 的布尔契约之下需要一条可测试、可遥测的路径：每条否决原因对应
///   算法的一条校验规则，属性测试与 fuzz 差分都以本函数为基准。
///
/// # 调用契约（What）
/// - **输入**：`buf` 为完整数据报；`space` 为协商的 RTCP 类型空间；`sink` 可选，
///   每个通过校验的链元素同步触发一次。
/// - **返回值**：`Ok(n)` 表示 `n`（≥1）个链元素恰好铺满数据报；`Err` 给出首个
///   否决原因。
/// - **后置条件**：无论成败均不修改缓冲、不保留引用、不分配内存。
///
/// # 实现细节（How）
/// 1. 长度不足 4 字节直接否决（此时 sink 零次触发）；
/// 2. 循环内先拆头部：版本号必须为 2；
/// 3. 换算声明长度并检查不超过剩余字节——`(length_words + 1) * 4` 恒 ≥ 4，
///    游标因此严格单调推进，循环必然终止；
/// 4. 类型字节必须落在 `space` 内，任何位置的空间外取值否决整个数据报；
/// 5. 回调 sink 后推进游标；循环结束时游标必须恰好等于数据报长度。
pub fn classify(
    buf: &[u8],
    space: &RtcpTypeSpace,
    mut sink: Option<&mut dyn DemuxSink>,
) -> Result<usize, RejectReason> {
    if buf.len() < RTCP_HEADER_LEN {
        return Err(RejectReason::DatagramTooShort { len: buf.len() });
    }

    let mut cursor = 0usize;
    let mut elements = 0usize;

    while cursor + RTCP_HEADER_LEN <= buf.len() {
        let header = RtcpHeaderView::from_prefix([
            buf[cursor],
            buf[cursor + 1],
            buf[cursor + 2],
            buf[cursor + 3],
        ]);

        if header.version != RTCP_VERSION {
            return Err(RejectReason::BadVersion {
                offset: cursor,
                version: header.version,
            });
        }

        let declared = header.packet_len();
        let available = buf.len() - cursor;
        if declared > available {
            return Err(RejectReason::LengthOverrun {
                offset: cursor,
                declared,
                available,
            });
        }

        if !space.contains(header.payload_type) {
            return Err(RejectReason::ForeignPayloadType {
                offset: cursor,
                payload_type: header.payload_type,
            });
        }

        if let Some(sink) = sink.as_deref_mut() {
            sink.on_packet(header.payload_type, declared);
        }

        elements += 1;
        cursor += declared;
    }

    if cursor != buf.len() {
        return Err(RejectReason::TrailingBytes {
            offset: cursor,
            leftover: buf.len() - cursor,
        });
    }

    Ok(elements)
}

/// 判定数据报是否为 RTCP（RFC 5761 §4）。
///
/// # 调用契约（What）
/// - **输入**：同 [`classify`]；`sink` 为 `None` 时仅做判定。
/// - **返回值**：`true` 当且仅当链元素以协商空间内的类型恰好铺满数据报且至少
///   存在一个元素；畸形、截断、含糊输入一律返回 `false`，绝不 panic。
/// - **并发性**：纯函数，无共享状态，可在任意线程对独立缓冲并发调用。
///
/// # 实现说明（How）
/// - 委托 [`classify`] 以保证两个入口判定一致；`std` 构建下否决原因以 `trace`
///   级别记录，便于在不改变控制流的前提下排查协商偏差。
#[must_use]
pub fn is_rtcp(buf: &[u8], space: &RtcpTypeSpace, sink: Option<&mut dyn DemuxSink>) -> bool {
    match classify(buf, space, sink) {
        Ok(_) => true,
        Err(_reason) => {
            #[cfg(feature = "std")]
            tracing::trace!(reason = %_reason, len = buf.len(), "数据报未通过 RTCP 分流校验");
            false
        }
    }
}

/// 收集数据报内全部链元素的位置记录。
///
/// - **Why**：原型中继按偏移切出各子报文（剥离填充后镜像转发），回调签名只携带
///   类型与长度，偏移由本函数补齐。
/// - **How**：以闭包 sink 复用 [`classify`] 的校验路径，偏移为元素长度的前缀和，
///   保证与布尔判定永远一致。
/// - **Contract**：`Ok` 中元素顺序与链内一致且区间两两相接；`Err` 与 [`classify`]
///   同义。典型链长不超过 [`DEFAULT_CHAIN_CAPACITY`] 时不发生堆分配。
pub fn collect_chain(buf: &[u8], space: &RtcpTypeSpace) -> Result<RtcpChainVec, RejectReason> {
    let mut chain = new_chain_vec();
    let mut offset = 0usize;
    let mut record = |payload_type: u8, len: usize| {
        // classify 已验证 offset 处存在完整头部，此处仅回读填充标志位。
        let padding = (buf[offset] & 0b0010_0000) != 0;
        chain.push(ChainElement {
            offset,
            payload_type,
            len,
            padding,
        });
        offset += len;
    };
    classify(buf, space, Some(&mut record))?;
    Ok(chain)
}
