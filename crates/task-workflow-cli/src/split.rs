//! `split` subcommand

use crate::cli::SplitArgs;
use crate::output::{table, Output};
use anyhow::{bail, Context, Result};
use dataset_split::{rebalance, SplitCandidate, SplitPercentages};

pub fn run(args: &SplitArgs, out: Output) -> Result<String> {
    let percentages = percentages(args)?;

    let content = std::fs::read_to_string(&args.candidates)
        .with_context(|| format!("Failed to read {}", args.candidates.display()))?;
    let candidates: Vec<SplitCandidate> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.candidates.display()))?;

    let plan = rebalance(&candidates, percentages);
    log::info!(
        "Split {} tasks, achieved {:?} for requested {:?}",
        candidates.len(),
        plan.achieved(),
        percentages.as_array()
    );

    out.render(&plan, || {
        let requested = percentages.as_array();
        let rows: Vec<Vec<String>> = plan
            .partitions
            .iter()
            .zip(requested)
            .map(|(p, want)| {
                vec![
                    p.dataset_type.to_string(),
                    format!("{}% (want {}%)", p.percentage, want),
                    format!("{} objects", p.object_count),
                    format!("{} images", p.image_count),
                    format!("{} tasks", p.task_ids.len()),
                ]
            })
            .collect();
        table(&rows)
    })
}

fn percentages(args: &SplitArgs) -> Result<SplitPercentages> {
    match (&args.percentages, &args.slider) {
        (Some(values), _) => match values.as_slice() {
            [training, validation, testing] => {
                Ok(SplitPercentages::new(*training, *validation, *testing)?)
            }
            _ => bail!("--percentages takes three values"),
        },
        (None, Some(values)) => match values.as_slice() {
            [min, max] => Ok(SplitPercentages::from_slider(*min, *max)?),
            _ => bail!("--slider takes two values"),
        },
        (None, None) => Ok(SplitPercentages::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args(percentages: Option<Vec<u8>>, slider: Option<Vec<u8>>) -> SplitArgs {
        SplitArgs {
            candidates: PathBuf::from("unused.json"),
            percentages,
            slider,
        }
    }

    #[test]
    fn test_percentage_sources() {
        assert_eq!(
            percentages(&args(None, None)).unwrap(),
            SplitPercentages::default()
        );
        assert_eq!(
            percentages(&args(None, Some(vec![60, 85]))).unwrap().as_array(),
            [60, 25, 15]
        );
        assert_eq!(
            percentages(&args(Some(vec![50, 30, 20]), None)).unwrap().as_array(),
            [50, 30, 20]
        );
    }

    #[test]
    fn test_bad_percentages() {
        assert!(percentages(&args(Some(vec![50, 30, 30]), None)).is_err());
        assert!(percentages(&args(None, Some(vec![90, 40]))).is_err());
    }

    #[test]
    fn test_split_candidate_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidates.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "a", "object_count": 70, "frame_count": 7},
                {"id": "b", "object_count": 20, "frame_count": 2},
                {"id": "c", "object_count": 10, "frame_count": 1}
            ]"#,
        )
        .unwrap();

        let split = SplitArgs {
            candidates: path,
            percentages: None,
            slider: None,
        };
        let out = run(&split, Output::new(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let ids: Vec<&serde_json::Value> = value["partitions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| &p["task_ids"])
            .collect();
        assert_eq!(
            ids,
            vec![
                &serde_json::json!(["a"]),
                &serde_json::json!(["b"]),
                &serde_json::json!(["c"])
            ]
        );
    }
}
