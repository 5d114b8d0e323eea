pub mod tasks;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::filter::{
    AuditSink, Controller, DisplayUnit, OutputRegion, RateLimiter, UiInstruction, escape_html,
};
use tasks::TaskGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

/// 服务端保存的界面状态：提示区 + 结果区
#[derive(Debug, Default)]
pub struct ViewState {
    message: Option<Message>,
    // 每次显示消息自增，用于识别过期的自动隐藏任务
    message_generation: u64,
    output: OutputRegion,
}

impl ViewState {
    fn show_message(&mut self, text: String, tone: Tone) -> u64 {
        self.message_generation += 1;
        self.message = Some(Message { text, tone });
        self.message_generation
    }

    fn hide_message(&mut self) {
        self.message_generation += 1;
        self.message = None;
    }

    fn hide_message_if_current(&mut self, generation: u64) {
        if self.message_generation == generation {
            self.message = None;
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            message: self.message.clone(),
            units: self.output.units().to_vec(),
            html: self.to_html(),
        }
    }

    pub fn message_html(&self) -> String {
        match &self.message {
            Some(message) => {
                let class = match message.tone {
                    Tone::Error => "message error",
                    Tone::Success => "message success",
                };
                format!(
                    r#"<p class="{}" role="status">{}</p>"#,
                    class,
                    escape_html(&message.text)
                )
            }
            None => r#"<p class="message" role="status" hidden></p>"#.to_string(),
        }
    }

    pub fn to_html(&self) -> String {
        format!("{}{}", self.message_html(), self.output.to_html())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub message: Option<Message>,
    pub units: Vec<DisplayUnit>,
    pub html: String,
}

fn lock_view(view: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 一个客户端的会话：控制器 + 界面状态 + 延时任务
pub struct Session {
    id: Uuid,
    controller: Controller,
    view: Arc<Mutex<ViewState>>,
    reveal_tasks: TaskGroup,
    message_tasks: TaskGroup,
    reveal_stagger: Duration,
    last_seen_ms: i64,
}

impl Session {
    pub fn new(config: &Config, audit: Arc<dyn AuditSink>, now_ms: i64) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_window_ms, config.rate_limit_requests);
        Self {
            id: Uuid::new_v4(),
            controller: Controller::new(limiter, audit)
                .with_success_message(config.success_message()),
            view: Arc::new(Mutex::new(ViewState::default())),
            reveal_tasks: TaskGroup::new(),
            message_tasks: TaskGroup::new(),
            reveal_stagger: config.reveal_stagger(),
            last_seen_ms: now_ms,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn last_seen_ms(&self) -> i64 {
        self.last_seen_ms
    }

    pub fn input_changed(&mut self, text: &str) -> UiInstruction {
        let instruction = self.controller.on_input_change(text);
        self.apply(&instruction);
        instruction
    }

    pub fn submit(&mut self, text: &str, now_ms: i64) -> UiInstruction {
        let instruction = self.controller.on_submit(text, now_ms);
        self.apply(&instruction);
        instruction
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        lock_view(&self.view).snapshot()
    }

    pub fn view_html(&self) -> String {
        lock_view(&self.view).to_html()
    }

    pub fn pending_tasks(&self) -> usize {
        self.reveal_tasks.pending() + self.message_tasks.pending()
    }

    fn apply(&mut self, instruction: &UiInstruction) {
        match instruction {
            UiInstruction::ShowError { message, .. } => {
                self.message_tasks.cancel_all();
                lock_view(&self.view).show_message(message.clone(), Tone::Error);
            }
            UiInstruction::ShowSuccess {
                message,
                hide_after_ms,
            } => {
                self.message_tasks.cancel_all();
                let generation =
                    lock_view(&self.view).show_message(message.clone(), Tone::Success);
                let view = self.view.clone();
                self.message_tasks
                    .schedule(Duration::from_millis(*hide_after_ms), async move {
                        lock_view(&view).hide_message_if_current(generation);
                    });
            }
            UiInstruction::Clear => {
                self.message_tasks.cancel_all();
                lock_view(&self.view).hide_message();
            }
            UiInstruction::Render { elements } => {
                // 新结果会取消上一轮尚未执行的显示与隐藏任务
                self.reveal_tasks.cancel_all();
                self.message_tasks.cancel_all();
                let units = {
                    let mut view = lock_view(&self.view);
                    view.hide_message();
                    let generation = view.output.render(elements, self.reveal_stagger);
                    view.output
                        .units()
                        .iter()
                        .map(|unit| (generation, unit.index, unit.reveal_after_ms))
                        .collect::<Vec<_>>()
                };
                for (generation, index, delay_ms) in units {
                    let view = self.view.clone();
                    self.reveal_tasks
                        .schedule(Duration::from_millis(delay_ms), async move {
                            lock_view(&view).output.reveal(generation, index);
                        });
                }
            }
        }
    }
}

/// 按客户端标识保存会话，仅在进程内存中
pub struct SessionRegistry {
    sessions: tokio::sync::Mutex<HashMap<String, Session>>,
    config: Config,
    audit: Arc<dyn AuditSink>,
}

impl SessionRegistry {
    pub fn new(config: Config, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            sessions: tokio::sync::Mutex::new(HashMap::new()),
            config,
            audit,
        }
    }

    /// 在持锁状态下操作指定客户端的会话，不存在时创建；同时刷新最近活动时间
    pub async fn with_session<R>(
        &self,
        key: &str,
        now_ms: i64,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(key.to_string()).or_insert_with(|| {
            let session = Session::new(&self.config, self.audit.clone(), now_ms);
            tracing::debug!("Created session {} for client {}", session.id(), key);
            session
        });
        session.last_seen_ms = now_ms;
        f(session)
    }

    /// 只读访问，会话不存在时返回 None 且不会创建
    pub async fn peek<R>(&self, key: &str, f: impl FnOnce(&Session) -> R) -> Option<R> {
        self.sessions.lock().await.get(key).map(f)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// 移除长时间无活动的会话，返回移除数量；会话内未执行的任务随之取消
    pub async fn sweep_idle(&self, now_ms: i64) -> usize {
        let idle_ms = i64::try_from(self.config.session_idle().as_millis()).unwrap_or(i64::MAX);
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| now_ms.saturating_sub(session.last_seen_ms()) <= idle_ms);
        before - sessions.len()
    }
}
