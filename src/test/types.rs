//! Rust types bound to the fixture hierarchy

use thiserror::Error;

/// Failure raised by the `broken` accessors of [`Point`]
#[derive(Debug, Error)]
#[error("broken {0}")]
pub struct Broken(pub String);

pub struct Base {
    pub id: i32,
    pub active: bool,
    pub tag: Option<String>,
}

pub struct Mid {
    pub base: Base,
    pub level: i64,
    pub name: String,
}

pub struct Leaf {
    pub mid: Mid,
    pub depth: i32,
}

impl Leaf {
    pub fn new(depth: i32) -> Self {
        Leaf {
            mid: Mid {
                base: Base {
                    id: 7,
                    active: false,
                    tag: None,
                },
                level: 2,
                name: "leaf".to_string(),
            },
            depth,
        }
    }
}

pub struct Point {
    pub x: i32,
    pub y: i32,
    pub label: Option<String>,
    pub weight: i64,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point {
            x,
            y,
            label: None,
            weight: 0,
        }
    }
}

/// Records which overload of a setter ran
#[derive(Default)]
pub struct Widget {
    pub last_setter: &'static str,
    pub value: Option<String>,
    pub count: f64,
    pub enabled: bool,
    pub url: String,
}
