#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # rtpmux-demux
//!
//! ## 教案目的（Why）
//! - **定位**：RFC 5761 单端口复用场景下的 RTP/RTCP 分流核心，负责在每个入站数据报
//!   进入媒体面或控制面之前给出权威判定。
//! - **架构角色**：媒体代理/中继收到 UDP 数据报后首先调用本 crate；判定为 RTCP 的
//!   缓冲可进一步做尾部填充归一化，再交给下游 RTCP 解码器。判定失误会把控制报文
//!   误投进媒体路径（或反之），破坏通话统计、关键帧请求与密钥重协商信令。
//! - **设计策略**：核心仅做两件事——链式长度一致性分类与填充长度归一化；套接字、
//!   会话簿记、SDP 协商均视为外部协作方，本 crate 不持有任何状态。
//!
//! ## 交互契约（What）
//! - **依赖输入**：调用方提供完整的数据报字节切片（一次调用对应一个数据报）与协商
//!   得到的 RTCP 类型空间 [`RtcpTypeSpace`]；诊断回调 [`DemuxSink`] 为可选参数。
//! - **输出职责**：
//!   1. [`is_rtcp`] 给出布尔判定，畸形输入一律回答「不是 RTCP」，绝不抛错；
//!   2. [`classify`] 返回链内子报文数量或结构化的 [`RejectReason`]，供遥测定位；
//!   3. [`effective_length`]/[`without_padding`] 暴露填充剥离后的逻辑长度/切片，
//!      从不改写原始字节。
//! - **前置约束**：缓冲所有权全程归调用方；回调仅在调用内同步触发，不得逃逸。
//!
//! ## 实现策略（How）
//! - **头部提取**：[`RtcpHeaderView`] 以显式移位与掩码从字节
//!   数组拆解位域，`length_words` 用 `u16::from_be_bytes` 处理网络字节序，不依赖
//!   编译器位域布局或宿主端序。
//! - **链式校验**：游标沿数据报逐个消费子报文，版本号、声明长度、类型空间三重校验
//!   任一失败即否决整个数据报；所有字段访问前都有边界检查，越界读取在结构上不可能。
//! - **无分配热路径**：分类与归一化既不分配也不加锁，可在任意线程并发调用；
//!   [`collect_chain`] 借助 `SmallVec` 将典型的 3~4 个链元素留在栈上。
//!
//! ## 风险提示（Trade-offs）
//! - **类型空间由外部供给**：RTCP 保留类型集合必须来自会话协商；[`RtcpTypeSpace::core`]
//!   只覆盖历史分配的 200-204，扩展类型（XR 等）需调用方显式加入。
//! - **填充归一化保守失败**：尾字节声明的填充数不可信时返回原长度，宁可多留几个
//!   字节也不破坏报文；下游若有更强先验可自行裁剪。

mod demux;
mod header;
mod padding;
mod types;

#[cfg(feature = "std")]
mod trace;

pub use crate::{
    demux::{
        ChainElement, DEFAULT_CHAIN_CAPACITY, DemuxSink, RejectReason, classify, collect_chain,
        is_rtcp,
    },
    header::{RTCP_HEADER_LEN, RTCP_VERSION, RtcpHeaderView},
    padding::{effective_length, without_padding},
    types::{MIN_RTCP_TYPE, RtcpTypeSpace},
};

#[cfg(feature = "std")]
pub use crate::trace::TraceSink;

/// 收集链元素时使用的小型向量。
///
/// ### 教案说明（Why）
/// - 一个数据报内的 RTCP 链通常只有少量子报文（SR+SDES+BYE 之类），`SmallVec`
///   将前几个元素直接存储在栈上，避免热路径堆分配。
/// - 与 [`collect_chain`] 返回类型共享，调用方统一引用该别名即可。
///
/// ### 合同约束（What）
/// - 内联容量与 [`DEFAULT_CHAIN_CAPACITY`] 相同；超出后自动回退堆分配，语义与
///   `SmallVec` 一致。
pub type RtcpChainVec = smallvec::SmallVec<[ChainElement; DEFAULT_CHAIN_CAPACITY]>;

/// 构造空的 [`RtcpChainVec`]，便于调用方无需直接引用 `smallvec` 依赖。
#[must_use]
pub fn new_chain_vec() -> RtcpChainVec {
    smallvec::SmallVec::new()
}
