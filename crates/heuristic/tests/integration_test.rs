//! Integration tests for the heuristic predictor.
//!
//! These tests load a small cutoff table from disk and check the
//! recommendation list end to end.

use heuristic::{CollegePredictor, DEFAULT_TOP_N};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "year,round,institute_type,institute_name,branch,quota,category,gender,is_pwd,opening_rank,closing_rank";

fn write_table(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

fn sample_rows() -> Vec<String> {
    let mut rows = Vec::new();

    // 30 NIT programs in the OPEN category with staggered cutoffs
    for i in 0..30u32 {
        let opening = 1000 + i * 400;
        let closing = opening + 2500;
        rows.push(format!(
            "2023,6,NIT,NIT Campus {i:02},Branch {i:02},OS,OPEN,Gender-Neutral,0,{opening},{closing}"
        ));
        // Earlier round of the same program, must be superseded
        rows.push(format!(
            "2023,1,NIT,NIT Campus {i:02},Branch {i:02},OS,OPEN,Gender-Neutral,0,{},{}",
            opening / 2,
            closing / 2
        ));
        // Female-only pool of the same program
        rows.push(format!(
            "2023,6,NIT,NIT Campus {i:02},Branch {i:02},OS,OPEN,Female-only (including Supernumerary),0,{},{}",
            opening + 3000,
            closing + 6000
        ));
    }

    // PwD seat that would otherwise rank first
    rows.push(
        "2023,6,IIT,IIT Bombay,Computer Science and Engineering,AI,OPEN,Gender-Neutral,1,1,9000"
            .to_string(),
    );
    // A different category
    rows.push("2023,6,NIT,NIT Campus 00,Branch 00,OS,SC,Gender-Neutral,0,200,900".to_string());
    rows
}

#[test]
fn test_recommendations_are_capped_and_uniform() {
    let table = write_table(&sample_rows());
    let predictor = CollegePredictor::load_model_and_data(table.path()).unwrap();

    let recs = predictor
        .get_recommendations_by_rank(5000, "OPEN", DEFAULT_TOP_N)
        .unwrap();

    assert!(!recs.is_empty());
    assert!(recs.len() <= DEFAULT_TOP_N);

    let keys: Vec<Vec<String>> = recs
        .iter()
        .map(|rec| {
            serde_json::to_value(rec)
                .unwrap()
                .as_object()
                .unwrap()
                .keys()
                .cloned()
                .collect()
        })
        .collect();
    assert!(keys.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_recommendations_use_final_round_neutral_non_pwd_seats() {
    let table = write_table(&sample_rows());
    let predictor = CollegePredictor::load_model_and_data(table.path()).unwrap();

    let recs = predictor
        .get_recommendations_by_rank(5000, "OPEN", DEFAULT_TOP_N)
        .unwrap();

    for rec in &recs {
        assert_eq!(rec.round, 6, "only the final round should be used");
        assert_eq!(rec.gender, "Gender-Neutral");
        assert_eq!(rec.category, "OPEN");
        assert_ne!(rec.institute_name, "IIT Bombay", "PwD seats must be excluded");
    }
}

#[test]
fn test_recommendations_are_sorted_by_chance() {
    let table = write_table(&sample_rows());
    let predictor = CollegePredictor::load_model_and_data(table.path()).unwrap();

    let recs = predictor
        .get_recommendations_by_rank(6000, "OPEN", DEFAULT_TOP_N)
        .unwrap();

    for pair in recs.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
        if pair[0].probability == pair[1].probability {
            assert!(pair[0].closing_rank <= pair[1].closing_rank);
        }
    }
}

#[test]
fn test_option_lists() {
    let table = write_table(&sample_rows());
    let predictor = CollegePredictor::load_model_and_data(table.path()).unwrap();

    assert_eq!(predictor.categories(), ["OPEN".to_string(), "SC".to_string()]);
    assert!(predictor.unique_values()["institute_types"].contains(&"IIT".to_string()));
}

#[test]
fn test_repeated_queries_are_identical() {
    let table = write_table(&sample_rows());
    let predictor = CollegePredictor::load_model_and_data(table.path()).unwrap();

    let first = predictor.get_recommendations_by_rank(7000, "OPEN", 10).unwrap();
    let second = predictor.get_recommendations_by_rank(7000, "OPEN", 10).unwrap();
    assert_eq!(first, second);
}
