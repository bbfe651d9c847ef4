//! `blur`：失焦后的延迟隐藏。
//!
//! 失焦时不直接收起候选面板，否则同一时刻的候选点击会丢失。这里不持有定时器：
//! `arm` 发出一个 token，宿主在延迟后把 token 回送；期间任何 focus/点击都会让它作废。

/// 一次延迟隐藏请求的凭据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HideToken(u64);

/// 挂起中的隐藏请求（至多一个）。
#[derive(Debug, Clone, Default)]
pub struct PendingHide {
    generation: u64,
    armed: Option<u64>,
}

impl PendingHide {
    /// 挂起一次新的隐藏请求；之前的 token 随之失效。
    pub fn arm(&mut self) -> HideToken {
        self.generation += 1;
        self.armed = Some(self.generation);
        HideToken(self.generation)
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// token 仍有效时消费它并返回 true。
    pub fn fire(&mut self, token: HideToken) -> bool {
        if self.armed == Some(token.0) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}
