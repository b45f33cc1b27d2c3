use std::io::Write;

use proptest::prelude::*;
use trackline::bbox::BBox;
use trackline::driver::{FrameLoop, JsonLinesSource, LoopStats, MemorySource};
use trackline::{ArrivalCounter, Counting, EntityCategory, Frame, SceneConfig, Track};

const DIMS: (u32, u32) = (1280, 720);

fn frame_line(t: f64, tracks: &[(u32, i32, [f32; 4])]) -> String {
    let tracks: Vec<_> = tracks
        .iter()
        .map(|(id, c, ltrb)| serde_json::json!({"id": id, "c": c, "p": 0.9, "ltrb": ltrb}))
        .collect();

    serde_json::json!({"timestamp": t, "dims": [DIMS.0, DIMS.1], "tracks": tracks}).to_string()
}

fn run_dump(lines: &[String], config: SceneConfig) -> (ArrivalCounter, String) {
    let (counter, src, _) = run_dump_with_stats(lines, config);
    (counter, src)
}

fn run_dump_with_stats(lines: &[String], config: SceneConfig) -> (ArrivalCounter, String, LoopStats) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();

    let src = "dump".to_string();
    let mut counter = ArrivalCounter::new(config).unwrap();
    let mut source = JsonLinesSource::open(file.path()).unwrap();
    let stats = FrameLoop::new(&src).run(&mut counter, &mut source, |_| {}).unwrap();

    (counter, src, stats)
}

/// Person crossing at t=1.0, car on the right half at t=2.0, truck on the left half at t=10.0.
fn three_categories() -> Vec<String> {
    vec![
        frame_line(0.9, &[(1, 0, [100.0, 300.0, 140.0, 390.0])]),
        frame_line(1.0, &[(1, 0, [105.0, 320.0, 145.0, 410.0])]),
        frame_line(1.9, &[(2, 2, [700.0, 330.0, 780.0, 390.0])]),
        frame_line(2.0, &[(2, 2, [740.0, 350.0, 820.0, 405.0])]),
        frame_line(9.9, &[(3, 7, [400.0, 300.0, 500.0, 399.0])]),
        frame_line(10.0, &[(3, 7, [360.0, 320.0, 460.0, 401.0])]),
    ]
}

#[test]
fn distinct_categories_start_their_own_streams() {
    let (counter, src) = run_dump(&three_categories(), SceneConfig::new(400.0));
    let arrivals = counter.arrivals(&src);

    let entities: Vec<_> = arrivals.iter().map(|r| r.entity()).collect();
    assert_eq!(
        entities,
        vec![
            EntityCategory::Crossers,
            EntityCategory::EbVehicles,
            EntityCategory::WbVehicles
        ]
    );

    let ids: Vec<_> = arrivals.iter().map(|r| r.sequence_id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let times: Vec<_> = arrivals.iter().map(|r| r.timestamp()).collect();
    assert_eq!(times, vec![1.0, 2.0, 10.0]);

    assert!(arrivals.iter().all(|r| r.inter_arrival() == 0.0));
}

#[test]
fn rerun_is_byte_identical() {
    let first = {
        let (counter, src) = run_dump(&three_categories(), SceneConfig::new(400.0));
        serde_json::to_string(&*counter.arrivals(&src)).unwrap()
    };
    let second = {
        let (counter, src) = run_dump(&three_categories(), SceneConfig::new(400.0));
        serde_json::to_string(&*counter.arrivals(&src)).unwrap()
    };

    assert_eq!(first, second);
    assert!(first.contains(r#""Entity":"EB Vehicles""#));
}

#[test]
fn malformed_input_does_not_stop_the_run() {
    let mut lines = three_categories();
    lines.insert(2, "{ this is not a frame".to_string());
    lines.insert(
        4,
        r#"{"timestamp": 1.95, "dims": [1280, 720], "tracks": [{"id": 8, "c": 2, "ltrb": [0, 0, "x", 4]}]}"#
            .to_string(),
    );
    lines.push(frame_line(10.1, &[(4, 2, [f32::NAN, 0.0, 10.0, 10.0])]));

    let (counter, src, stats) = run_dump_with_stats(&lines, SceneConfig::new(400.0));

    assert_eq!(counter.arrivals(&src).len(), 3);
    assert_eq!(stats.malformed_lines, 1);
    assert_eq!(stats.malformed_tracks, 2);
}

#[test]
fn bad_track_does_not_hide_a_crossing_in_the_same_frame() {
    let lines = vec![
        frame_line(0.9, &[(1, 2, [700.0, 330.0, 780.0, 390.0])]),
        r#"{"timestamp": 1.0, "dims": [1280, 720], "tracks": [
            {"id": 1, "c": 2, "p": 0.9, "ltrb": [700.0, 345.0, 780.0, 405.0]},
            {"id": 9, "c": 2, "p": 0.9, "ltrb": [0, 0, null, 4]}
        ]}"#
        .replace('\n', " "),
        frame_line(5.0, &[(1, 2, [700.0, 400.0, 780.0, 460.0])]),
    ];

    let (counter, src, stats) = run_dump_with_stats(&lines, SceneConfig::new(400.0));
    let arrivals = counter.arrivals(&src);

    assert_eq!(stats.malformed_lines, 0);
    assert_eq!(stats.malformed_tracks, 1);
    assert_eq!(stats.frames, 3);
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].timestamp(), 1.0);
    assert_eq!(arrivals[0].entity(), EntityCategory::EbVehicles);
}

#[test]
fn nan_boxes_are_counted_as_skipped() {
    let mut counter = ArrivalCounter::new(SceneConfig::new(400.0)).unwrap();
    let frames = vec![
        Frame::new(DIMS, 0.0, vec![Track::new(1, 2, BBox::ltrb(0.0, f32::NAN, 10.0, 10.0))]),
        Frame::new(DIMS, 0.1, vec![Track::new(1, 2, BBox::ltrb(0.0, 0.0, 10.0, 390.0))]),
        Frame::new(DIMS, 0.2, vec![Track::new(1, 2, BBox::ltrb(0.0, 0.0, 10.0, 410.0))]),
    ];

    let stats = FrameLoop::new("cam")
        .run(&mut counter, &mut MemorySource::from(frames), |_| {})
        .unwrap();

    assert_eq!(stats.arrivals, 1);
    assert_eq!(counter.scene("cam").unwrap().stats().skipped, 1);
}

#[test]
fn missing_input_is_an_error() {
    assert!(JsonLinesSource::open("/nonexistent/tracks.jsonl").is_err());
}

proptest! {
    #[test]
    fn sequence_ids_are_contiguous(
        steps in prop::collection::vec((0u32..6, 0usize..3, 300.0f32..500.0), 1..200)
    ) {
        const CLASSES: [i32; 3] = [0, 2, 5];

        let frames: Vec<Frame> = steps
            .iter()
            .enumerate()
            .map(|(i, &(id, class, bottom))| {
                let left = 100.0 + (i % 50) as f32 * 10.0;
                let bbox = BBox::ltrb(left, bottom - 60.0, left + 40.0, bottom);
                Frame::new(DIMS, i as f64 * 0.1, vec![Track::new(id, CLASSES[class], bbox)])
            })
            .collect();

        let mut counter = ArrivalCounter::new(SceneConfig::new(400.0)).unwrap();
        counter.update(&frames, "p").unwrap();
        let arrivals = counter.arrivals("p");

        prop_assert!(arrivals.len() <= 6);
        for (i, record) in arrivals.iter().enumerate() {
            prop_assert_eq!(record.sequence_id(), i + 1);
            prop_assert!(record.inter_arrival() >= 0.0);
        }
    }
}
