use crate::filter::{MAX_ORDER, MIN_ORDER, escape_html};

// 页面脚本只通过 textContent 写入文本，不拼接 HTML
const SCRIPT: &str = r#"
(() => {
  const form = document.getElementById('ladder-form');
  const input = document.getElementById('order');
  const view = document.getElementById('view');
  // 提示自动隐藏与结果逐项显示分开管理，新的消息或结果会取消旧的定时器
  let hideTimer = null;
  let revealTimers = [];
  let validateSeq = 0;

  const messageEl = () => view.querySelector('.message');
  const cancelHide = () => {
    clearTimeout(hideTimer);
    hideTimer = null;
  };
  const cancelReveals = () => {
    revealTimers.forEach(clearTimeout);
    revealTimers = [];
  };

  const showMessage = (text, tone) => {
    cancelHide();
    const el = messageEl();
    el.textContent = text;
    el.className = 'message ' + tone;
    el.hidden = false;
  };
  const hideMessage = () => {
    cancelHide();
    const el = messageEl();
    el.textContent = '';
    el.hidden = true;
  };
  const scheduleHide = (delay) => {
    cancelHide();
    hideTimer = setTimeout(hideMessage, delay);
  };

  const post = (url, text) => fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ text }),
  }).then((r) => r.json());

  input.addEventListener('input', () => {
    const seq = ++validateSeq;
    post('/api/validate', input.value).then((res) => {
      // 丢弃乱序到达的旧校验结果
      if (seq !== validateSeq) return;
      const ins = res.resp_data;
      if (!ins) return;
      if (ins.kind === 'show_error') showMessage(ins.message, 'error');
      else if (ins.kind === 'show_success') {
        showMessage(ins.message, 'success');
        scheduleHide(ins.hide_after_ms);
      } else hideMessage();
    });
  });

  form.addEventListener('submit', (event) => {
    event.preventDefault();
    // 提交后尚未返回的校验结果不再生效
    validateSeq++;
    post('/api/calculate', input.value).then((res) => {
      if (res.code !== 0) { showMessage(res.msg, 'error'); return; }
      cancelReveals();
      hideMessage();
      const list = view.querySelector('.elements');
      list.replaceChildren();
      res.resp_data.units.forEach((unit) => {
        const li = document.createElement('li');
        li.className = 'element element-' + unit.kind + ' pending';
        const icon = document.createElement('span');
        icon.className = 'icon';
        icon.textContent = unit.icon;
        const sentence = document.createElement('span');
        sentence.className = 'sentence';
        sentence.textContent = unit.sentence;
        li.append(icon, ' ', sentence);
        list.append(li);
        revealTimers.push(setTimeout(() => li.classList.replace('pending', 'revealed'), unit.reveal_after_ms));
      });
    });
  });
})();
"#;

/// 完整的表单页面，value 为输入框回填内容
pub fn render_page(value: &str, view_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Butterworth Ladder Calculator</title>
<style>.element.pending {{ opacity: 0.2; }} .element.revealed {{ opacity: 1; transition: opacity 0.3s; }} .message.error {{ color: #b00020; }} .message.success {{ color: #1b5e20; }}</style>
</head>
<body>
<h1>Butterworth Ladder Calculator</h1>
<form id="ladder-form" method="post" action="/calculate">
<label for="order">Filter order ({min}&ndash;{max})</label>
<input id="order" name="order" type="text" inputmode="numeric" autocomplete="off" value="{value}">
<button type="submit">Calculate</button>
</form>
<section id="view">{view}</section>
<script>{script}</script>
</body>
</html>
"#,
        min = MIN_ORDER,
        max = MAX_ORDER,
        value = escape_html(value),
        view = view_html,
        script = SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // 取出脚本中某个箭头函数的函数体
    fn script_fn(name: &str) -> &'static str {
        let start = SCRIPT
            .find(&format!("const {} = ", name))
            .unwrap_or_else(|| panic!("{} not defined", name));
        let body = &SCRIPT[start..];
        &body[..body.find("\n  };").expect("function end")]
    }

    #[test]
    fn every_message_change_cancels_pending_hide() {
        for name in ["showMessage", "hideMessage", "scheduleHide"] {
            assert!(
                script_fn(name).contains("cancelHide()"),
                "{} must cancel the pending hide timer",
                name
            );
        }
        assert!(script_fn("cancelHide").contains("clearTimeout(hideTimer)"));
        // 自动隐藏只通过 scheduleHide 安排
        assert_eq!(SCRIPT.matches("setTimeout(hideMessage").count(), 1);
        assert!(script_fn("scheduleHide").contains("hideTimer = setTimeout(hideMessage"));
    }

    #[test]
    fn stale_validation_responses_are_dropped() {
        assert!(SCRIPT.contains("const seq = ++validateSeq;"));
        assert!(SCRIPT.contains("if (seq !== validateSeq) return;"));
    }

    #[test]
    fn input_value_is_escaped() {
        let html = render_page(r#""><script>alert(1)</script>"#, "");
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;""#));
        assert_eq!(html.matches("<script>").count(), 1);
    }
}
