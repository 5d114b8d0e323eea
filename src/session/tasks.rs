use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// 可取消的延时任务句柄
#[derive(Debug, Clone)]
pub struct TaskHandle {
    abort: AbortHandle,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// 一组同批次的延时任务，新一轮提交前整体取消
#[derive(Debug, Default)]
pub struct TaskGroup {
    handles: Vec<TaskHandle>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 需要在 tokio 运行时中调用
    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.retain(|handle| !handle.is_finished());

        let join = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        });
        let handle = TaskHandle {
            abort: join.abort_handle(),
        };
        self.handles.push(handle.clone());
        handle
    }

    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.cancel();
        }
    }

    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
