//! Static registry of the three AS categories.
//!
//! Each category maps to its own SQLite table and an ordered list of
//! (display label, field key) pairs. The order drives the bulk statement
//! column order and the export header row; the Korean labels are never used
//! on the wire.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Converter,
    Floodlight,
}

/// Storage affinity of a field, mirroring the column type in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub label: &'static str,
    pub key: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug)]
pub struct CategorySpec {
    pub key: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

const fn text(label: &'static str, key: &'static str) -> FieldDef {
    FieldDef {
        label,
        key,
        kind: FieldKind::Text,
    }
}

const fn int(label: &'static str, key: &'static str) -> FieldDef {
    FieldDef {
        label,
        key,
        kind: FieldKind::Integer,
    }
}

/// Shared by general items and floodlights.
const MATERIAL_FIELDS: &[FieldDef] = &[
    int("NO.", "no"),
    text("구분", "division"),
    text("클레임 NO.", "claim_no"),
    text("호선번호", "hull_number"),
    text("불량 자재코드", "defective_material_code"),
    text("대체 자재 코드", "alternative_material_code"),
    text("제품명", "product_name"),
    int("수량", "quantity"),
    text("접수일", "receipt_date"),
    text("완료일", "completion_date"),
    text("비고", "notes"),
];

const CONVERTER_FIELDS: &[FieldDef] = &[
    int("NO.", "no"),
    text("구분", "division"),
    text("클레임 NO.", "claim_no"),
    text("호선번호", "hull_number"),
    text("컨버터 번호", "converter_number"),
    text("컨버터 코드", "converter_code"),
    text("설치 위치", "installation_location"),
    text("제품명", "product_name"),
    int("수량", "quantity"),
    text("접수일", "receipt_date"),
    text("완료일", "completion_date"),
    text("비고", "notes"),
];

static GENERAL: CategorySpec = CategorySpec {
    key: "general",
    table: "as_general",
    fields: MATERIAL_FIELDS,
};

static CONVERTER: CategorySpec = CategorySpec {
    key: "converter",
    table: "as_converter",
    fields: CONVERTER_FIELDS,
};

static FLOODLIGHT: CategorySpec = CategorySpec {
    key: "floodlight",
    table: "as_floodlight",
    fields: MATERIAL_FIELDS,
};

impl Category {
    pub const ALL: [Category; 3] = [Category::General, Category::Converter, Category::Floodlight];

    /// Registry lookup by wire key (`general`, `converter`, `floodlight`).
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Same as [`Category::lookup`] but fails with `InvalidCategory`.
    pub fn parse(key: &str) -> AppResult<Self> {
        Self::lookup(key).ok_or_else(|| AppError::InvalidCategory(key.to_string()))
    }

    pub fn spec(&self) -> &'static CategorySpec {
        match self {
            Category::General => &GENERAL,
            Category::Converter => &CONVERTER,
            Category::Floodlight => &FLOODLIGHT,
        }
    }

    pub fn key(&self) -> &'static str {
        self.spec().key
    }

    pub fn table(&self) -> &'static str {
        self.spec().table
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.spec().fields
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.key == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
