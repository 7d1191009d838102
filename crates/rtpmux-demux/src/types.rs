//! 协商得到的 RTCP 类型空间。
//!
//! # 教案定位（Why）
//! - RFC 5761 复用的前提是 RTP 负载类型与 RTCP 报文类型两个空间互不相交；哪些类型
//!   值算 RTCP 取决于会话协商结果，核心不应自行猜测。
//! - 本模块把「保留给 RTCP 的类型集合」建模为调用期传入的值类型，由宿主守护进程
//!   从媒体描述里构造；未协商扩展类型时使用保守的历史默认 200-204。
//!
//! # 契约说明（What）
//! - IANA 把 RTCP 报文类型分配在 192-255 区间，集合以 64 bit 掩码覆盖该区间；
//!   低于 192 的取值永远不是 RTCP，也无法被加入集合。
//! - 全部构造器为 `const fn`，可用于静态默认配置。

/// IANA RTCP 类型区间的下界。
pub const MIN_RTCP_TYPE: u8 = 192;

/// 保留给 RTCP 的报文类型集合。
///
/// ### Why
/// - 分类器需要在链的每个位置判断类型字节是否属于 RTCP 空间，任何位置出现空间外
///   取值都否决整个数据报。
///
/// ### What
/// - [`RtcpTypeSpace::core`] 覆盖历史分配的 SR/RR/SDES/BYE/APP（200-204）；
/// - [`RtcpTypeSpace::with`] 按协商结果追加注册扩展（如 XR=207）；
/// - `Default` 等价于 `core()`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcpTypeSpace {
    mask: u64,
}

impl RtcpTypeSpace {
    /// 构造空集合，通常作为按位累加的起点。
    #[must_use]
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// 历史分配的核心类型集合：SR(200)、RR(201)、SDES(202)、BYE(203)、APP(204)。
    #[must_use]
    pub const fn core() -> Self {
        Self {
            mask: 0b1_1111 << (200 - MIN_RTCP_TYPE),
        }
    }

    /// 返回追加一个类型值后的新集合。
    ///
    /// 低于 [`MIN_RTCP_TYPE`] 的取值不属于 RTCP 类型区间，集合保持不变。
    #[must_use]
    pub const fn with(self, payload_type: u8) -> Self {
        if payload_type < MIN_RTCP_TYPE {
            return self;
        }
        Self {
            mask: self.mask | 1 << (payload_type - MIN_RTCP_TYPE),
        }
    }

    /// 判断类型字节是否属于本集合。
    #[must_use]
    pub const fn contains(&self, payload_type: u8) -> bool {
        if payload_type < MIN_RTCP_TYPE {
            return false;
        }
        (self.mask >> (payload_type - MIN_RTCP_TYPE)) & 1 == 1
    }
}

impl Default for RtcpTypeSpace {
    fn default() -> Self {
        Self::core()
    }
}
