//! `tracing` 适配的诊断 sink（仅 `std` 构建）。
//!
//! 分类核心自身不做日志决策；宿主进程挂上本 sink 即可把链内子报文旁路到统一的
//! `tracing` 订阅体系，事件级别固定为 `trace`，不影响分类结果。

use crate::demux::DemuxSink;

/// 将每个链元素记录为 `tracing` 事件的诊断 sink。
///
/// - **Why**：排查分流问题时最常用的信息就是链内各子报文的类型与长度；
///   以现成 sink 提供，免得每个调用点重写同样的闭包。
/// - **Contract**：零尺寸、可复制；回调内仅发出 `trace!` 事件，耗时取决于订阅端，
///   核心假定订阅端为非阻塞实现。
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceSink;

impl TraceSink {
    /// 构造 sink 实例，可用于常量上下文。
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DemuxSink for TraceSink {
    fn on_packet(&mut self, payload_type: u8, packet_len: usize) {
        tracing::trace!(payload_type, packet_len, "RTCP 链内子报文");
    }
}
