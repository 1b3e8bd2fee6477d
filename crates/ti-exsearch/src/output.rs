//! Result writers for an ex-search run: `final_output.csv` and
//! `analysis_results.json`.

use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use ti_core::{write_csv, write_json_pretty, TiResult};

use crate::montage::json_key;
use crate::scheduler::MontageRecord;

#[derive(Debug, Clone, Serialize)]
struct AnalysisEntry {
    #[serde(rename = "Current_Ch1_mA")]
    current_ch1_ma: f64,
    #[serde(rename = "Current_Ch2_mA")]
    current_ch2_ma: f64,
    #[serde(rename = "TImax_ROI")]
    timax_roi: f64,
    #[serde(rename = "TImean_ROI")]
    timean_roi: f64,
    #[serde(rename = "TImean_GM")]
    timean_gm: f64,
    #[serde(rename = "Focality")]
    focality: f64,
    #[serde(rename = "Composite_Index")]
    composite_index: f64,
    #[serde(rename = "n_elements")]
    n_elements: usize,
}

impl From<&MontageRecord> for AnalysisEntry {
    fn from(record: &MontageRecord) -> Self {
        Self {
            current_ch1_ma: record.current_ch1_ma,
            current_ch2_ma: record.current_ch2_ma,
            timax_roi: record.timax_roi,
            timean_roi: record.timean_roi,
            timean_gm: record.timean_gm,
            focality: record.focality,
            composite_index: record.composite_index,
            n_elements: record.n_elements,
        }
    }
}

/// Write `final_output.csv`, with floats formatted to four decimals
/// (`csv`'s serde integration writes full `f64` precision, so the
/// four-decimal rows are built by hand here).
pub fn write_final_csv(dir: &Path, records: &[MontageRecord]) -> TiResult<PathBuf> {
    #[derive(Serialize)]
    struct Row<'a> {
        #[serde(rename = "Montage")]
        montage: &'a str,
        #[serde(rename = "Current_Ch1_mA")]
        current_ch1_ma: String,
        #[serde(rename = "Current_Ch2_mA")]
        current_ch2_ma: String,
        #[serde(rename = "TImax_ROI")]
        timax_roi: String,
        #[serde(rename = "TImean_ROI")]
        timean_roi: String,
        #[serde(rename = "TImean_GM")]
        timean_gm: String,
        #[serde(rename = "Focality")]
        focality: String,
        #[serde(rename = "Composite_Index")]
        composite_index: String,
        #[serde(rename = "n_elements")]
        n_elements: usize,
    }

    let rows: Vec<Row> = records
        .iter()
        .map(|r| Row {
            montage: &r.montage,
            current_ch1_ma: format!("{:.4}", r.current_ch1_ma),
            current_ch2_ma: format!("{:.4}", r.current_ch2_ma),
            timax_roi: format!("{:.4}", r.timax_roi),
            timean_roi: format!("{:.4}", r.timean_roi),
            timean_gm: format!("{:.4}", r.timean_gm),
            focality: format!("{:.4}", r.focality),
            composite_index: format!("{:.4}", r.composite_index),
            n_elements: r.n_elements,
        })
        .collect();

    let path = dir.join("final_output.csv");
    write_csv(&path, &rows)?;
    Ok(path)
}

/// A JSON object serialized in the iteration order of its entries rather
/// than a `BTreeMap`'s key order, since `analysis_results.json` entries
/// must appear in enumeration order.
struct OrderedEntries<'a>(Vec<(String, &'a AnalysisEntry)>);

impl Serialize for OrderedEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, entry) in &self.0 {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

/// Write `analysis_results.json`, keyed by `TI_field_<montage>_I1-...mA_I2-...mA.msh`
/// so distinct current ratios for the same electrode tuple get distinct
/// entries, in enumeration order.
pub fn write_analysis_json(dir: &Path, records: &[MontageRecord]) -> TiResult<PathBuf> {
    let entries: Vec<AnalysisEntry> = records.iter().map(AnalysisEntry::from).collect();
    let ordered = OrderedEntries(
        records
            .iter()
            .map(|r| json_key(&r.key))
            .zip(entries.iter())
            .collect(),
    );
    let path = dir.join("analysis_results.json");
    write_json_pretty(&path, &ordered)?;
    Ok(path)
}
