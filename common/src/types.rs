//! 選択肢の型定義
//!
//! CLIとデスクトップで共有される列挙型:
//! - MetalIon: 検出対象の重金属イオン
//! - Technique: 電気化学測定手法

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 対象重金属イオン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum MetalIon {
    #[default]
    Lead,
    Cadmium,
    Mercury,
    Arsenic,
}

impl MetalIon {
    /// ドロップダウンの表示順
    pub const ALL: [MetalIon; 4] = [
        MetalIon::Lead,
        MetalIon::Cadmium,
        MetalIon::Mercury,
        MetalIon::Arsenic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetalIon::Lead => "Lead (Pb²⁺)",
            MetalIon::Cadmium => "Cadmium (Cd²⁺)",
            MetalIon::Mercury => "Mercury (Hg²⁺)",
            MetalIon::Arsenic => "Arsenic (As³⁺)",
        }
    }

    /// 元素記号
    pub fn symbol(&self) -> &'static str {
        match self {
            MetalIon::Lead => "Pb",
            MetalIon::Cadmium => "Cd",
            MetalIon::Mercury => "Hg",
            MetalIon::Arsenic => "As",
        }
    }
}

impl fmt::Display for MetalIon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetalIon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        MetalIon::ALL
            .into_iter()
            .find(|m| {
                m.label() == needle
                    || m.symbol().eq_ignore_ascii_case(needle)
                    || format!("{:?}", m).eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("Unknown metal ion: {}. Use lead, cadmium, mercury, or arsenic", s))
    }
}

/// 電気化学測定手法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Technique {
    #[default]
    CyclicVoltammetry,
    AnodicStrippingVoltammetry,
    DifferentialPulseVoltammetry,
    SquareWaveVoltammetry,
    LinearSweepVoltammetry,
}

impl Technique {
    /// ドロップダウンの表示順
    pub const ALL: [Technique; 5] = [
        Technique::CyclicVoltammetry,
        Technique::AnodicStrippingVoltammetry,
        Technique::DifferentialPulseVoltammetry,
        Technique::SquareWaveVoltammetry,
        Technique::LinearSweepVoltammetry,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Technique::CyclicVoltammetry => "Cyclic Voltammetry (CV)",
            Technique::AnodicStrippingVoltammetry => "Anodic Stripping Voltammetry (ASV)",
            Technique::DifferentialPulseVoltammetry => "Differential Pulse Voltammetry (DPV)",
            Technique::SquareWaveVoltammetry => "Square Wave Voltammetry (SWV)",
            Technique::LinearSweepVoltammetry => "Linear Sweep Voltammetry (LSV)",
        }
    }

    /// 略称 (CV/ASV/DPV/SWV/LSV)
    pub fn code(&self) -> &'static str {
        match self {
            Technique::CyclicVoltammetry => "CV",
            Technique::AnodicStrippingVoltammetry => "ASV",
            Technique::DifferentialPulseVoltammetry => "DPV",
            Technique::SquareWaveVoltammetry => "SWV",
            Technique::LinearSweepVoltammetry => "LSV",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Technique {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Technique::ALL
            .into_iter()
            .find(|t| {
                t.label() == needle
                    || t.code().eq_ignore_ascii_case(needle)
                    || format!("{:?}", t).eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("Unknown technique: {}. Use cv, asv, dpv, swv, or lsv", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_is_first_option() {
        assert_eq!(MetalIon::default(), MetalIon::ALL[0]);
        assert_eq!(Technique::default(), Technique::ALL[0]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MetalIon::Lead.to_string(), "Lead (Pb²⁺)");
        assert_eq!(MetalIon::Arsenic.to_string(), "Arsenic (As³⁺)");
        assert_eq!(Technique::SquareWaveVoltammetry.to_string(), "Square Wave Voltammetry (SWV)");
    }

    #[test]
    fn test_technique_from_str() {
        assert_eq!("swv".parse::<Technique>().unwrap(), Technique::SquareWaveVoltammetry);
        assert_eq!("LSV".parse::<Technique>().unwrap(), Technique::LinearSweepVoltammetry);
        assert_eq!(
            "Anodic Stripping Voltammetry (ASV)".parse::<Technique>().unwrap(),
            Technique::AnodicStrippingVoltammetry
        );
        assert_eq!(
            "differentialpulsevoltammetry".parse::<Technique>().unwrap(),
            Technique::DifferentialPulseVoltammetry
        );
        assert!("xrd".parse::<Technique>().is_err());
    }

    #[test]
    fn test_metal_ion_from_str() {
        assert_eq!("pb".parse::<MetalIon>().unwrap(), MetalIon::Lead);
        assert_eq!("Cadmium".parse::<MetalIon>().unwrap(), MetalIon::Cadmium);
        assert_eq!("Mercury (Hg²⁺)".parse::<MetalIon>().unwrap(), MetalIon::Mercury);
        assert!("gold".parse::<MetalIon>().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Technique::DifferentialPulseVoltammetry).expect("シリアライズ失敗");
        assert_eq!(json, "\"DifferentialPulseVoltammetry\"");
        let restored: Technique = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(restored, Technique::DifferentialPulseVoltammetry);
    }
}
