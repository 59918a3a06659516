//! 入力フォームの状態
//!
//! 全フィールドは常に値を持つ（未編集なら既定値）。手法を切り替えても値は消さず、
//! 有効/無効は fields::groups_for() の表だけで決まる。

use crate::fields::{current_active_fields, groups_for, FieldGroup, FieldName, FIELD_SPECS};
use crate::record::OptimizationRecord;
use crate::types::{MetalIon, Technique};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormModel {
    metal_ion: MetalIon,
    technique: Technique,
    values: [f64; 5],
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new(MetalIon::default(), Technique::default())
    }
}

impl FormModel {
    pub fn new(metal_ion: MetalIon, technique: Technique) -> Self {
        Self {
            metal_ion,
            technique,
            values: FIELD_SPECS.map(|spec| spec.default),
        }
    }

    pub fn metal_ion(&self) -> MetalIon {
        self.metal_ion
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn set_metal_ion(&mut self, metal_ion: MetalIon) {
        self.metal_ion = metal_ion;
    }

    /// 手法を切り替える（入力済みの値は保持）
    pub fn set_technique(&mut self, technique: Technique) {
        if self.technique != technique {
            log::debug!("technique: {} -> {}", self.technique.code(), technique.code());
        }
        self.technique = technique;
    }

    /// 値を設定し、実際に保存された（クランプ後の）値を返す
    pub fn set_field(&mut self, name: FieldName, value: f64) -> f64 {
        let stored = name.spec().clamp(value);
        if stored != value {
            log::debug!("{}: {} をクランプ → {}", name, value, stored);
        }
        self.values[name.index()] = stored;
        stored
    }

    /// 現在の値（無効フィールドでも保持値を返す）
    pub fn value(&self, name: FieldName) -> f64 {
        self.values[name.index()]
    }

    pub fn active_groups(&self) -> &'static [FieldGroup] {
        groups_for(self.technique)
    }

    pub fn active_fields(&self) -> BTreeSet<FieldName> {
        current_active_fields(self.technique)
    }

    pub fn is_active(&self, name: FieldName) -> bool {
        name.group().is_active_for(self.technique)
    }

    /// 有効フィールドの (名前, 値) を列順で返す
    pub fn active_values(&self) -> Vec<(FieldName, f64)> {
        self.active_fields()
            .into_iter()
            .map(|name| (name, self.value(name)))
            .collect()
    }

    /// 現在の入力から記録を作る
    pub fn snapshot(&self) -> OptimizationRecord {
        OptimizationRecord::new(self.metal_ion, self.technique, |name| {
            self.is_active(name).then(|| self.value(name))
        })
    }

    /// 「Submit Optimization Query」用の照会内容（テーブルは変更しない）
    pub fn query_summary(&self) -> QuerySummary {
        QuerySummary {
            metal_ion: self.metal_ion,
            technique: self.technique,
            values: self.active_values(),
        }
    }
}

/// 照会内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySummary {
    pub metal_ion: MetalIon,
    pub technique: Technique,
    pub values: Vec<(FieldName, f64)>,
}

impl QuerySummary {
    /// 表示用の行（"ラベル: 値"）
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Selected Metal Ion: {}", self.metal_ion),
            format!("Technique: {}", self.technique),
        ];
        for (name, value) in &self.values {
            let spec = name.spec();
            lines.push(format!("{}: {}", spec.column, spec.cell(*value)));
        }
        lines
    }
}
