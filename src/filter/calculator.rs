use std::f64::consts::PI;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Capacitor,
    Inductor,
}

impl ElementKind {
    /// 梯形网络从电感开始交替：奇数位为电感，偶数位为电容
    pub fn at(index: u32) -> Self {
        if index % 2 == 0 {
            ElementKind::Capacitor
        } else {
            ElementKind::Inductor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Capacitor => "Capacitor",
            ElementKind::Inductor => "Inductor",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ElementKind::Capacitor => "C",
            ElementKind::Inductor => "L",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ElementKind::Capacitor => "F",
            ElementKind::Inductor => "H",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterElement {
    pub kind: ElementKind,
    pub index: u32,
    /// 归一化元件值，固定保留4位小数
    pub value: String,
}

/// g_k = 2·sin((2k−1)π / 2n)
pub fn normalized_value(order: u32, index: u32) -> f64 {
    2.0 * (((2 * index - 1) as f64) * PI / (2 * order) as f64).sin()
}

/// 调用方需保证 order 已通过校验
pub fn compute_elements(order: u32) -> Vec<FilterElement> {
    (1..=order)
        .map(|index| FilterElement {
            kind: ElementKind::at(index),
            index,
            value: format!("{:.4}", normalized_value(order, index)),
        })
        .collect()
}
