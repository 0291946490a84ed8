// src/output.rs
use crate::diagnostics::{ExerciseProfile, ValueSummary};
use std::fs::File;
use std::io::{self, Write};

pub fn write_exercise_profile_to_csv(filename: &str, profile: &ExerciseProfile) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "exercise_date,paths,fraction")?;
    for ((date, count), fraction) in profile
        .dates
        .iter()
        .zip(&profile.counts)
        .zip(profile.fractions())
    {
        writeln!(file, "{},{},{}", date, count, fraction)?;
    }
    let never = profile.never_exercised as f64 / profile.total_paths.max(1) as f64;
    writeln!(file, "never,{},{}", profile.never_exercised, never)?;
    Ok(())
}

/// Key/value summary stamped with the time it was written
pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, String)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "generated,{}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}

/// Rows for [`write_summary_to_csv`] describing one bound
pub fn summary_rows(label: &str, summary: &ValueSummary) -> Vec<(String, String)> {
    vec![
        (format!("{}_mean", label), summary.mean.to_string()),
        (format!("{}_std_error", label), summary.standard_error.to_string()),
        (format!("{}_paths", label), summary.paths.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::ExerciseSchedule;
    use crate::random_variable::PathVector;
    use std::fs;

    #[test]
    fn test_profile_csv() {
        let schedule = ExerciseSchedule::uniform(vec![1.0, 2.0], 1.0, 100.0).unwrap();
        let times = PathVector::from_vec(0.0, vec![1.0, 2.0, 3.0, 3.0]);
        let profile = ExerciseProfile::from_exercise_times(&schedule, &times).unwrap();

        let path = std::env::temp_dir().join("bermudan_mc_profile_test.csv");
        let filename = path.to_str().unwrap();
        write_exercise_profile_to_csv(filename, &profile).unwrap();

        let contents = fs::read_to_string(filename).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "exercise_date,paths,fraction");
        assert_eq!(lines[1], "1,1,0.25");
        assert_eq!(lines[3], "never,2,0.5");
        fs::remove_file(filename).unwrap();
    }

    #[test]
    fn test_summary_csv() {
        let summary = ValueSummary::from_path_vector(&PathVector::from_vec(0.0, vec![1.0, 3.0]));
        let rows = summary_rows("primal", &summary);
        let borrowed: Vec<(&str, String)> =
            rows.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();

        let path = std::env::temp_dir().join("bermudan_mc_summary_test.csv");
        let filename = path.to_str().unwrap();
        write_summary_to_csv(filename, &borrowed).unwrap();

        let contents = fs::read_to_string(filename).unwrap();
        assert!(contents.starts_with("generated,"));
        assert!(contents.contains("primal_mean,2"));
        fs::remove_file(filename).unwrap();
    }
}
