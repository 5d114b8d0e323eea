use std::time::Duration;

use serde::Serialize;

use super::calculator::{ElementKind, FilterElement};

pub const DEFAULT_REVEAL_STAGGER: Duration = Duration::from_millis(50);

/// 所有写入标记的文本都必须经过这里
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn icon_for(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Capacitor => "⚡",
        ElementKind::Inductor => "🌀",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayUnit {
    pub kind: ElementKind,
    pub index: u32,
    pub icon: &'static str,
    pub sentence: String,
    pub reveal_after_ms: u64,
    pub revealed: bool,
}

impl DisplayUnit {
    fn from_element(element: &FilterElement, stagger: Duration) -> Self {
        let kind = element.kind;
        Self {
            kind,
            index: element.index,
            icon: icon_for(kind),
            sentence: format!(
                "{} {}{} has a normalized value of {} {}.",
                kind.label(),
                kind.symbol(),
                element.index,
                element.value,
                kind.unit()
            ),
            reveal_after_ms: u64::try_from(stagger.as_millis())
                .unwrap_or(u64::MAX)
                .saturating_mul(u64::from(element.index.saturating_sub(1))),
            revealed: false,
        }
    }

    pub fn to_html(&self) -> String {
        let state = if self.revealed { "revealed" } else { "pending" };
        format!(
            r#"<li class="element element-{kind} {state}" style="animation-delay: {delay}ms"><span class="icon" aria-hidden="true">{icon}</span> <span class="sentence">{sentence}</span></li>"#,
            kind = escape_html(self.kind.label()).to_lowercase(),
            state = state,
            delay = self.reveal_after_ms,
            icon = escape_html(self.icon),
            sentence = escape_html(&self.sentence),
        )
    }
}

/// 结果输出区域，每次渲染都会替换之前的内容
#[derive(Debug, Clone, Default)]
pub struct OutputRegion {
    units: Vec<DisplayUnit>,
    generation: u64,
}

impl OutputRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空旧结果后渲染新的一批，返回本批次的代号
    pub fn render(&mut self, elements: &[FilterElement], stagger: Duration) -> u64 {
        self.clear();
        self.units = elements
            .iter()
            .map(|element| DisplayUnit::from_element(element, stagger))
            .collect();
        self.generation
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.generation += 1;
    }

    /// 旧批次的显示任务直接忽略
    pub fn reveal(&mut self, generation: u64, index: u32) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.units.iter_mut().find(|unit| unit.index == index) {
            Some(unit) => {
                unit.revealed = true;
                true
            }
            None => false,
        }
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    pub fn to_html(&self) -> String {
        let items: String = self.units.iter().map(DisplayUnit::to_html).collect();
        format!(r#"<ol class="elements">{}</ol>"#, items)
    }
}
