//! `chipster_core`：chip（标签）输入框的纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **核心可复用**：TUI/GUI/Web 宿主都能复用同一套状态机
//! - **分层清晰**：session -> processor 链 -> store/suggestion -> 输出（`UiState` + `Action`）
//! - **可测试**：没有定时器、没有全局状态；失焦延迟隐藏由宿主按 token 回调
pub mod blur;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
pub mod id;
pub mod key_event;
pub mod model;
pub mod processor;
pub mod session;
pub mod store;
pub mod suggestion;
pub mod validation;
