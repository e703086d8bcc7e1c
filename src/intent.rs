use crate::lexicon::Lexicon;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Realtime,
    Prediction,
    General,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntentAnalysis {
    pub is_congestion_query: bool,
    pub intent_type: IntentType,
    pub confidence: f64,
}

/// Classifies whether a query asks about congestion and whether it wants the
/// current state or a forecast. Each marker counts once however often it
/// appears.
pub fn classify_intent(query: &str, lexicon: &Lexicon) -> IntentAnalysis {
    let query = query.to_lowercase();
    let count = |markers: &[String]| {
        markers
            .iter()
            .filter(|marker| query.contains(marker.to_lowercase().as_str()))
            .count()
    };

    let realtime = count(lexicon.realtime_markers.as_slice());
    let prediction = count(lexicon.prediction_markers.as_slice());
    let congestion = count(lexicon.congestion_markers.as_slice());

    let intent_type = if realtime > prediction {
        IntentType::Realtime
    } else if prediction > 0 {
        IntentType::Prediction
    } else {
        IntentType::General
    };

    IntentAnalysis {
        is_congestion_query: realtime + prediction + congestion > 0,
        intent_type,
        confidence: ((realtime + prediction + congestion) as f64 / 3.0).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(query: &str) -> IntentAnalysis {
        classify_intent(query, &Lexicon::default())
    }

    #[test]
    fn current_state_question_is_realtime() {
        let intent = classify("지금 강남역 사람 많아?");
        assert_eq!(intent.intent_type, IntentType::Realtime);
        assert!(intent.is_congestion_query);
        // 지금 and 사람; "많아" is not a marker
        assert!((intent.confidence - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_question_is_prediction() {
        let intent = classify("내일 명동 혼잡 예상");
        assert_eq!(intent.intent_type, IntentType::Prediction);
        assert_eq!(intent.confidence, 1.0);
    }

    #[test]
    fn prediction_wins_ties() {
        let intent = classify("오늘이랑 내일 비교");
        assert_eq!(intent.intent_type, IntentType::Prediction);
    }

    #[test]
    fn plain_lookup_is_general() {
        let intent = classify("경복궁 위치");
        assert_eq!(intent.intent_type, IntentType::General);
        assert!(!intent.is_congestion_query);
        assert_eq!(intent.confidence, 0.0);
    }

    #[test]
    fn congestion_only_stays_general() {
        let intent = classify("홍대 복잡해?");
        assert_eq!(intent.intent_type, IntentType::General);
        assert!(intent.is_congestion_query);
    }

    #[test]
    fn repeated_marker_counts_once() {
        let intent = classify("혼잡 혼잡 혼잡");
        assert!((intent.confidence - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_query_is_general() {
        let intent = classify("");
        assert_eq!(intent.intent_type, IntentType::General);
        assert!(!intent.is_congestion_query);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&classify("실시간 혼잡")).unwrap();
        assert!(json.contains(r#""intent_type":"realtime""#));
    }
}
