use fatigue::{EyeIndices, Landmark, MonitorConfig, LEFT_EYE, RIGHT_EYE};
use replay::{replay, FrameRecord, ReplayError};
use serde_json::Value;

/// Face-mesh frame with both eyes at the given openness ratio
fn face(ratio: f64) -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::default(); 468];
    place_eye(&mut landmarks, &LEFT_EYE, 0.0, ratio);
    place_eye(&mut landmarks, &RIGHT_EYE, 100.0, ratio);
    landmarks
}

fn place_eye(landmarks: &mut [Landmark], eye: &EyeIndices, x0: f64, ratio: f64) {
    let half = 5.0 * ratio;
    landmarks[eye.horizontal[0]] = Landmark::new(x0, 0.0);
    landmarks[eye.horizontal[1]] = Landmark::new(x0 + 10.0, 0.0);
    for i in 0..2 {
        let x = x0 + 3.0 + 4.0 * i as f64;
        landmarks[eye.upper[i]] = Landmark::new(x, half);
        landmarks[eye.lower[i]] = Landmark::new(x, -half);
    }
}

fn line(timestamp_ms: u64, landmarks: Option<Vec<Landmark>>) -> String {
    let record = FrameRecord {
        timestamp_ms,
        landmarks,
    };
    serde_json::to_string(&record).unwrap()
}

fn parse_output(out: &[u8]) -> Vec<Value> {
    std::str::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn test_replay_scores_every_frame() {
    let input = [
        line(0, Some(face(0.1))),
        line(1000, Some(face(0.1))),
        line(2000, Some(face(0.3))),
    ]
    .join("\n");

    let mut out = Vec::new();
    let stats = replay(&MonitorConfig::default(), input.as_bytes(), &mut out)
        .await
        .unwrap();

    assert_eq!(stats.frames, 3);
    let analyses = parse_output(&out);
    assert_eq!(analyses.len(), 3);

    let last = &analyses[2];
    assert_eq!(last["timestamp_ms"], 2000);
    assert_eq!(last["scores"][0]["detector"], "perclos");
    assert_eq!(last["scores"][0]["score"], 0);
    assert_eq!(last["scores"][0]["level"], "fatigue");
    assert_eq!(last["scores"][0]["detail"], "100.0%");
}

#[tokio::test]
async fn test_replay_skips_bad_lines() {
    let input = [
        line(0, Some(face(0.3))),
        "not json".to_string(),
        String::new(),
        line(1000, Some(face(0.3))),
        line(500, Some(face(0.1))),
        line(1500, None),
    ]
    .join("\n");

    let mut out = Vec::new();
    let stats = replay(&MonitorConfig::default(), input.as_bytes(), &mut out)
        .await
        .unwrap();

    assert_eq!(stats.frames, 3);
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.rejected, 1);

    let analyses = parse_output(&out);
    assert_eq!(analyses[2]["face_detected"], false);
    assert!(analyses[2].get("openness").is_none());
}

#[tokio::test]
async fn test_replay_aborts_on_topology_mismatch() {
    let input = line(0, Some(vec![Landmark::new(0.0, 0.0); 12]));

    let mut out = Vec::new();
    let err = replay(&MonitorConfig::default(), input.as_bytes(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, ReplayError::Fatigue(_)));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_replay_empty_stream() {
    let mut out = Vec::new();
    let stats = replay(&MonitorConfig::default(), &b""[..], &mut out)
        .await
        .unwrap();

    assert_eq!(stats, Default::default());
    assert!(out.is_empty());
}
