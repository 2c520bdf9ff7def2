use anyhow::Result;
use serde::Serialize;

use crate::model::Report;

#[derive(Debug, Serialize)]
struct WrappedReport<'a> {
    schema: &'static str,
    version: u32,
    scene_lengths: Vec<usize>,
    #[serde(flatten)]
    report: &'a Report,
}

pub fn write_json(r: &Report, pretty: bool) -> Result<String> {
    let w = WrappedReport {
        schema: "playstat.report",
        version: 1,
        scene_lengths: r.scene_lengths(),
        report: r,
    };
    if pretty {
        Ok(serde_json::to_string_pretty(&w)?)
    } else {
        Ok(serde_json::to_string(&w)?)
    }
}
