//! 登録済みパラメータセット（不変スナップショット）

use crate::fields::FieldName;
use crate::table::Cell;
use crate::types::{MetalIon, Technique};
use serde::Serialize;

/// 最適化パラメータの記録
///
/// FormModel::snapshot() でのみ生成される。フィールドが Some を持つのは
/// そのグループが記録の手法に対して有効な場合に限る。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecord {
    metal_ion: MetalIon,
    technique: Technique,
    deposition_potential: Option<f64>,
    deposition_time: Option<u32>,
    scan_rate: Option<u32>,
    pulse_amplitude: Option<u32>,
    pulse_width: Option<u32>,
}

impl OptimizationRecord {
    /// value は有効フィールドだけが Some で渡される前提
    pub(crate) fn new(
        metal_ion: MetalIon,
        technique: Technique,
        value: impl Fn(FieldName) -> Option<f64>,
    ) -> Self {
        let int = |name: FieldName| value(name).map(|v| v as u32);
        Self {
            metal_ion,
            technique,
            deposition_potential: value(FieldName::DepositionPotential),
            deposition_time: int(FieldName::DepositionTime),
            scan_rate: int(FieldName::ScanRate),
            pulse_amplitude: int(FieldName::PulseAmplitude),
            pulse_width: int(FieldName::PulseWidth),
        }
    }

    pub fn metal_ion(&self) -> MetalIon {
        self.metal_ion
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    /// フィールド値（非該当なら None）
    pub fn value(&self, name: FieldName) -> Option<f64> {
        match name {
            FieldName::DepositionPotential => self.deposition_potential,
            FieldName::DepositionTime => self.deposition_time.map(f64::from),
            FieldName::ScanRate => self.scan_rate.map(f64::from),
            FieldName::PulseAmplitude => self.pulse_amplitude.map(f64::from),
            FieldName::PulseWidth => self.pulse_width.map(f64::from),
        }
    }

    /// テーブル列順のセル
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(2 + FieldName::ALL.len());
        cells.push(Cell::Text(self.metal_ion.label().to_string()));
        cells.push(Cell::Text(self.technique.label().to_string()));
        for name in FieldName::ALL {
            let cell = self.value(name).map(|v| name.spec().cell(v));
            cells.push(cell.unwrap_or(Cell::NotApplicable));
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::current_active_fields;

    fn record_for(technique: Technique) -> OptimizationRecord {
        let active = current_active_fields(technique);
        OptimizationRecord::new(MetalIon::Cadmium, technique, |name| {
            active.contains(&name).then(|| name.spec().default)
        })
    }

    #[test]
    fn test_numeric_iff_active() {
        for technique in Technique::ALL {
            let record = record_for(technique);
            let active = current_active_fields(technique);
            for name in FieldName::ALL {
                assert_eq!(record.value(name).is_some(), active.contains(&name), "{:?}", name);
            }
        }
    }

    #[test]
    fn test_cells_in_column_order() {
        let record = record_for(Technique::AnodicStrippingVoltammetry);
        let cells: Vec<String> = record.cells().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            cells,
            vec![
                "Cadmium (Cd²⁺)",
                "Anodic Stripping Voltammetry (ASV)",
                "-1.2",
                "60",
                "N/A",
                "N/A",
                "N/A",
            ]
        );
    }

    #[test]
    fn test_serialize_uses_null_for_inactive() {
        let record = record_for(Technique::CyclicVoltammetry);
        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"technique\":\"CyclicVoltammetry\""));
        assert!(json.contains("\"scanRate\":50"));
        assert!(json.contains("\"pulseWidth\":null"));
    }
}
