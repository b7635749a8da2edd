//! Fixed expense type catalog.
//!
//! Values are what the backend stores; labels are what the UI shows.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordType {
    pub choice: Choice,
    pub sub_types: &'static [Choice],
}

/// Sub-type every type starts with.
pub const NO_SUB_TYPE: Choice = Choice {
    label: "None",
    value: "无",
};

const fn choice(label: &'static str, value: &'static str) -> Choice {
    Choice { label, value }
}

pub const TYPES: &[RecordType] = &[
    RecordType {
        choice: choice("Food", "吃吃吃"),
        sub_types: &[
            NO_SUB_TYPE,
            choice("Breakfast", "早餐"),
            choice("Lunch", "午餐"),
            choice("Dinner", "晚餐"),
            choice("Drinks", "饮料"),
            choice("Snacks", "零食"),
            choice("Other", "其他"),
        ],
    },
    RecordType {
        choice: choice("Shopping", "买买买"),
        sub_types: &[
            NO_SUB_TYPE,
            choice("Taobao", "淘宝"),
            choice("JD", "京东"),
            choice("Other", "其他"),
        ],
    },
    RecordType {
        choice: choice("Travel", "出行"),
        sub_types: &[
            NO_SUB_TYPE,
            choice("Bus", "公交"),
            choice("Coach", "长途"),
            choice("Lodging", "住宿"),
            choice("Other", "其他"),
        ],
    },
];

/// Looks a type up by its wire value.
pub fn find(value: &str) -> Option<&'static RecordType> {
    TYPES.iter().find(|t| t.choice.value == value)
}

/// Display label for a wire value, falling back to the value itself.
pub fn type_label(value: &str) -> &str {
    find(value).map(|t| t.choice.label).unwrap_or(value)
}

pub fn sub_type_label<'a>(kind: &str, value: &'a str) -> &'a str {
    find(kind)
        .and_then(|t| t.sub_types.iter().find(|s| s.value == value))
        .map(|s| s.label)
        .unwrap_or(value)
}
