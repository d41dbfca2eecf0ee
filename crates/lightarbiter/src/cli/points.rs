//! `points` subcommand: list control-point files for the configured layout.

use super::{
    Config, ControlPoint, ControlPointPaths, PointJson, PointsOutput, Result, kv, kv_width,
};

pub(super) fn collect_points(paths: &ControlPointPaths) -> Vec<PointJson> {
    ControlPoint::ALL
        .into_iter()
        .map(|point| {
            let path = paths.path(point);
            PointJson {
                name: point.to_string(),
                exists: path.exists(),
                path: path.display().to_string(),
            }
        })
        .collect()
}

pub(super) fn cmd_points(config: &Config, json: bool) -> Result<()> {
    let paths = ControlPointPaths::from_config(config);
    let points = collect_points(&paths);

    if json {
        let output = PointsOutput {
            root: paths.root.display().to_string(),
            points,
        };
        return super::print_json(&output);
    }

    let w = kv_width(&["LED root:"], &[]);
    kv("LED root:", paths.root.display(), w);
    println!();

    let name_w = points.iter().map(|p| p.name.len()).max().unwrap_or(0) + 2;
    for p in &points {
        let mark = if p.exists { "ok" } else { "missing" };
        println!("  {:<name_w$}{:<9}{}", p.name, mark, p.path);
    }

    let missing = points.iter().filter(|p| !p.exists).count();
    if missing > 0 {
        println!();
        println!("{missing} of {} control points missing.", points.len());
    }
    Ok(())
}
