//! 測定パラメータ定義と手法ごとの有効フィールド表
//!
//! 各フィールドの範囲・既定値・刻み幅は FIELD_SPECS に集約し、
//! 手法 → フィールドグループの対応は groups_for() のみで決める。
//! 描画・登録・照会のどの経路もこの表を参照する。

use crate::table::Cell;
use crate::types::Technique;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// フィールドグループ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldGroup {
    /// 電析電位・電析時間
    Deposition,
    /// 掃引速度
    Scan,
    /// パルス振幅・パルス幅
    Pulse,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 3] = [FieldGroup::Deposition, FieldGroup::Scan, FieldGroup::Pulse];

    pub fn label(&self) -> &'static str {
        match self {
            FieldGroup::Deposition => "Deposition",
            FieldGroup::Scan => "Scan",
            FieldGroup::Pulse => "Pulse",
        }
    }

    /// グループに属するフィールド（表示順）
    pub fn fields(&self) -> &'static [FieldName] {
        match self {
            FieldGroup::Deposition => &[FieldName::DepositionPotential, FieldName::DepositionTime],
            FieldGroup::Scan => &[FieldName::ScanRate],
            FieldGroup::Pulse => &[FieldName::PulseAmplitude, FieldName::PulseWidth],
        }
    }

    pub fn is_active_for(&self, technique: Technique) -> bool {
        groups_for(technique).contains(self)
    }
}

/// 手法ごとの有効グループ表
///
/// 手法を追加した場合はこの match が網羅性エラーになるので、ここだけを更新すればよい。
pub fn groups_for(technique: Technique) -> &'static [FieldGroup] {
    match technique {
        Technique::CyclicVoltammetry => &[FieldGroup::Scan],
        Technique::AnodicStrippingVoltammetry => &[FieldGroup::Deposition],
        Technique::DifferentialPulseVoltammetry => &[FieldGroup::Deposition, FieldGroup::Pulse],
        Technique::SquareWaveVoltammetry => &[FieldGroup::Deposition, FieldGroup::Pulse],
        Technique::LinearSweepVoltammetry => &[FieldGroup::Scan],
    }
}

/// 手法に対して入力可能なフィールド名の集合
pub fn current_active_fields(technique: Technique) -> BTreeSet<FieldName> {
    groups_for(technique)
        .iter()
        .flat_map(|g| g.fields().iter().copied())
        .collect()
}

/// 数値フィールド名（列順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldName {
    DepositionPotential,
    DepositionTime,
    ScanRate,
    PulseAmplitude,
    PulseWidth,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::DepositionPotential,
        FieldName::DepositionTime,
        FieldName::ScanRate,
        FieldName::PulseAmplitude,
        FieldName::PulseWidth,
    ];

    pub fn spec(&self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index()]
    }

    pub fn group(&self) -> FieldGroup {
        self.spec().group
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            FieldName::DepositionPotential => 0,
            FieldName::DepositionTime => 1,
            FieldName::ScanRate => 2,
            FieldName::PulseAmplitude => 3,
            FieldName::PulseWidth => 4,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().label)
    }
}

/// 数値の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Float,
    Integer,
}

/// 小数フィールドの保存精度（桁数）
pub const STORED_DECIMALS: usize = 6;

/// 数値フィールドの定義
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub group: FieldGroup,
    /// 入力欄のラベル
    pub label: &'static str,
    /// 結果テーブルの列名
    pub column: &'static str,
    pub kind: NumberKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl FieldSpec {
    /// 入力値を範囲内に丸める
    ///
    /// 方針は拒否ではなくクランプ: 範囲外は境界値、整数フィールドは四捨五入後にクランプ、
    /// NaN/無限大は既定値に戻す。
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let value = match self.kind {
            // 刻み幅の加算で生じる誤差を落とす
            NumberKind::Float => {
                let scale = 10f64.powi(STORED_DECIMALS as i32);
                (value * scale).round() / scale
            }
            NumberKind::Integer => value.round(),
        };
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// 範囲表示などで使う最小の小数桁数
    pub fn decimals(&self) -> usize {
        match self.kind {
            NumberKind::Integer => 0,
            NumberKind::Float => 1,
        }
    }

    /// 保存値のセル表現（表示・照会・CSVで共通）
    pub fn cell(&self, value: f64) -> Cell {
        match self.kind {
            NumberKind::Float => Cell::Float(value),
            NumberKind::Integer => Cell::Integer(value.round() as i64),
        }
    }
}

pub const FIELD_SPECS: [FieldSpec; 5] = [
    FieldSpec {
        name: FieldName::DepositionPotential,
        group: FieldGroup::Deposition,
        label: "Deposition Potential (V)",
        column: "Deposition Potential (V)",
        kind: NumberKind::Float,
        min: -2.0,
        max: 0.0,
        step: 0.1,
        default: -1.2,
    },
    FieldSpec {
        name: FieldName::DepositionTime,
        group: FieldGroup::Deposition,
        label: "Deposition Time (seconds)",
        column: "Deposition Time (s)",
        kind: NumberKind::Integer,
        min: 10.0,
        max: 300.0,
        step: 10.0,
        default: 60.0,
    },
    FieldSpec {
        name: FieldName::ScanRate,
        group: FieldGroup::Scan,
        label: "Scan Rate (mV/s)",
        column: "Scan Rate (mV/s)",
        kind: NumberKind::Integer,
        min: 5.0,
        max: 200.0,
        step: 5.0,
        default: 50.0,
    },
    FieldSpec {
        name: FieldName::PulseAmplitude,
        group: FieldGroup::Pulse,
        label: "Pulse Amplitude (mV)",
        column: "Pulse Amplitude (mV)",
        kind: NumberKind::Integer,
        min: 10.0,
        max: 200.0,
        step: 5.0,
        default: 50.0,
    },
    FieldSpec {
        name: FieldName::PulseWidth,
        group: FieldGroup::Pulse,
        label: "Pulse Width (ms)",
        column: "Pulse Width (ms)",
        kind: NumberKind::Integer,
        min: 1.0,
        max: 50.0,
        step: 1.0,
        default: 10.0,
    },
];
