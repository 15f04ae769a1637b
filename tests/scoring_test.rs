use chrono::Utc;

use grading_worker::domain::{
    band_for, review_route, snap_score, Band, Confidence, GradeResult, ReviewPriority,
    SpeakingGrade, SubmissionStatus, WritingGrade,
};

#[test]
fn snap_score_rounds_up_to_nearest_half() {
    assert_eq!(snap_score(7.3), 7.5);
    assert_eq!(snap_score(7.8), 8.0);
    assert_eq!(snap_score(6.75), 7.0);
}

#[test]
fn snap_score_rounds_down_to_nearest_half() {
    assert_eq!(snap_score(7.2), 7.0);
    assert_eq!(snap_score(7.1), 7.0);
    assert_eq!(snap_score(6.24), 6.0);
}

#[test]
fn snap_score_keeps_exact_values() {
    assert_eq!(snap_score(0.0), 0.0);
    assert_eq!(snap_score(10.0), 10.0);
    assert_eq!(snap_score(7.5), 7.5);
    assert_eq!(snap_score(7.0), 7.0);
}

#[test]
fn snap_score_resolves_ties_half_to_even() {
    // 7.25 doubles to 14.5, which rounds to the even 14.
    assert_eq!(snap_score(7.25), 7.0);
    // 7.75 doubles to 15.5, which rounds to the even 16.
    assert_eq!(snap_score(7.75), 8.0);
}

#[test]
fn band_for_c1() {
    assert_eq!(band_for(8.5), Some(Band::C1));
    assert_eq!(band_for(9.0), Some(Band::C1));
    assert_eq!(band_for(10.0), Some(Band::C1));
}

#[test]
fn band_for_b2() {
    assert_eq!(band_for(8.4), Some(Band::B2));
    assert_eq!(band_for(6.0), Some(Band::B2));
    assert_eq!(band_for(7.5), Some(Band::B2));
}

#[test]
fn band_for_b1() {
    assert_eq!(band_for(5.9), Some(Band::B1));
    assert_eq!(band_for(4.0), Some(Band::B1));
    assert_eq!(band_for(4.5), Some(Band::B1));
}

#[test]
fn band_for_none() {
    assert_eq!(band_for(3.9), None);
    assert_eq!(band_for(0.0), None);
    assert_eq!(band_for(2.0), None);
}

fn writing_grade(scores: [f64; 4], confidence: Confidence) -> WritingGrade {
    serde_json::from_value(serde_json::json!({
        "task_achievement": scores[0],
        "coherence_cohesion": scores[1],
        "lexical_resource": scores[2],
        "grammatical_range": scores[3],
        "feedback": "Solid essay",
        "confidence": match confidence {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        },
    }))
    .unwrap()
}

#[test]
fn given_writing_criteria_when_reduced_then_mean_is_snapped_and_banded() {
    let grade = writing_grade([8.0, 7.0, 6.5, 7.5], Confidence::High);

    let result = GradeResult::from_writing(grade, Utc::now());

    // mean 7.25 doubles to 14.5, half-to-even lands on 7.0
    assert_eq!(result.overall_score, 7.0);
    assert_eq!(result.band, Some(Band::B2));
    assert_eq!(result.criteria_scores["taskAchievement"], 8.0);
    assert_eq!(result.criteria_scores["coherenceCohesion"], 7.0);
    assert_eq!(result.criteria_scores["lexicalResource"], 6.5);
    assert_eq!(result.criteria_scores["grammaticalRange"], 7.5);
    assert_eq!(result.criteria_scores.len(), 4);
}

#[test]
fn given_identical_grades_when_reduced_twice_then_results_match() {
    let graded_at = Utc::now();
    let first = GradeResult::from_writing(writing_grade([6.0, 6.5, 7.0, 6.5], Confidence::Medium), graded_at);
    let second = GradeResult::from_writing(writing_grade([6.0, 6.5, 7.0, 6.5], Confidence::Medium), graded_at);

    assert_eq!(first.overall_score, second.overall_score);
    assert_eq!(first.band, second.band);
    assert_eq!(first.criteria_scores, second.criteria_scores);
    assert_eq!(first.feedback, second.feedback);
}

#[test]
fn given_speaking_grade_when_reduced_then_uses_speaking_criterion_names() {
    let grade: SpeakingGrade = serde_json::from_value(serde_json::json!({
        "fluency": 9.0,
        "pronunciation": 8.5,
        "content": 8.5,
        "vocabulary": 9.0,
        "feedback": "Excellent delivery",
        "confidence": "high",
    }))
    .unwrap();

    let result = GradeResult::from_speaking(grade, Utc::now());

    assert_eq!(result.overall_score, 8.5);
    assert_eq!(result.band, Some(Band::C1));
    assert_eq!(result.criteria_scores["fluency"], 9.0);
    assert_eq!(result.criteria_scores["pronunciation"], 8.5);
    assert!(result.grammar_errors.is_none());
}

#[test]
fn review_route_by_confidence() {
    assert_eq!(
        review_route(Confidence::High),
        (SubmissionStatus::Completed, None)
    );
    assert_eq!(
        review_route(Confidence::Medium),
        (SubmissionStatus::ReviewPending, Some(ReviewPriority::Medium))
    );
    assert_eq!(
        review_route(Confidence::Low),
        (SubmissionStatus::ReviewPending, Some(ReviewPriority::High))
    );
}
