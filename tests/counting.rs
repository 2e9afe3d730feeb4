use linecount::counter::CounterConfig;
use linecount::tracker::TrackerConfig;
use linecount::{
    CentroidTracker, Config, CountStats, Detection, Direction, FrameReader, PeopleCounter,
    Pipeline,
};

const LINE_Y: i32 = 300;
const H: i32 = 6;

fn person(cx: f32, cy: f32) -> Detection {
    Detection::new(cx - 20.0, cy - 60.0, cx + 20.0, cy + 60.0, 0.8)
}

fn components(cooldown_frames: u32) -> (CentroidTracker, PeopleCounter) {
    let tracker = CentroidTracker::new(TrackerConfig {
        max_distance: 120.0,
        max_age: 30,
    })
    .unwrap();
    let counter = PeopleCounter::new(CounterConfig {
        line_y: LINE_Y,
        hysteresis: H,
        cooldown_frames,
        max_missed_frames: 5,
    })
    .unwrap();

    (tracker, counter)
}

fn step(
    tracker: &mut CentroidTracker,
    counter: &mut PeopleCounter,
    dets: &[Detection],
) -> Vec<Direction> {
    let tracked = tracker.update(dets);
    counter
        .update(&tracked)
        .into_iter()
        .map(|e| e.direction)
        .collect()
}

#[test]
fn two_people_walking_opposite_ways() {
    let (mut tracker, mut counter) = components(10);

    // one walks down from y=190, the other up from y=410, 300px apart in x
    for i in 0..=10 {
        let d = i as f32 * 20.0;
        step(
            &mut tracker,
            &mut counter,
            &[person(100.0, 190.0 + d), person(400.0, 410.0 - d)],
        );
    }

    assert_eq!(
        counter.stats(),
        CountStats {
            entered: 1,
            exited: 1,
            total: 2
        }
    );
    assert_eq!(tracker.stats().next_id, 2);
}

#[test]
fn slow_walker_through_dead_zone_is_not_counted() {
    let (mut tracker, mut counter) = components(10);

    // 4px steps: at least one frame lands inside [294, 306]
    let mut y = 280.0;
    while y <= 320.0 {
        step(&mut tracker, &mut counter, &[person(100.0, y)]);
        y += 4.0;
    }

    assert_eq!(counter.stats().total, 0);
}

#[test]
fn jitter_around_line_never_counts() {
    let (mut tracker, mut counter) = components(0);

    for i in 0..50 {
        let y = if i % 2 == 0 { 295.0 } else { 305.0 };
        assert!(step(&mut tracker, &mut counter, &[person(100.0, y)]).is_empty());
    }

    assert_eq!(counter.stats().total, 0);
}

#[test]
fn cooldown_then_reversal() {
    let cooldown = 10;
    let above = (LINE_Y - H - 1) as f32;
    let below = (LINE_Y + H + 1) as f32;
    let (mut tracker, mut counter) = components(cooldown);

    step(&mut tracker, &mut counter, &[person(100.0, above)]);
    assert_eq!(
        step(&mut tracker, &mut counter, &[person(100.0, below)]),
        vec![Direction::Entered]
    );
    assert!(step(&mut tracker, &mut counter, &[person(100.0, above)]).is_empty());

    // back below, wait out the cooldown, then cross up
    for _ in 0..cooldown {
        step(&mut tracker, &mut counter, &[person(100.0, below)]);
    }
    assert_eq!(
        step(&mut tracker, &mut counter, &[person(100.0, above)]),
        vec![Direction::Exited]
    );
}

#[test]
fn counter_forgets_before_tracker_does() {
    let (mut tracker, mut counter) = components(10);

    step(&mut tracker, &mut counter, &[person(100.0, 250.0)]);
    for _ in 0..6 {
        step(&mut tracker, &mut counter, &[]);
    }

    // still tracked (age 6 <= 30) but its counting state is gone
    assert!(tracker.get(0).is_some());
    assert!(counter.state_of(0).is_none());

    // reappears below under the same id: treated as a fresh observation
    let directions = step(&mut tracker, &mut counter, &[person(100.0, 350.0)]);
    assert!(directions.is_empty());
    assert_eq!(counter.stats().total, 0);
}

#[test]
fn duplicate_claims_are_deduplicated_by_counter() {
    let (mut tracker, mut counter) = components(10);

    step(&mut tracker, &mut counter, &[person(100.0, 280.0)]);

    // two boxes close together both claim track 0; the last one decides
    let tracked = tracker.update(&[person(100.0, 320.0), person(110.0, 285.0)]);
    assert_eq!(tracked[0].track_id, tracked[1].track_id);

    assert!(counter.update(&tracked).is_empty());
    assert_eq!(counter.state_of(0).unwrap().last_y, 285);
}

#[test]
fn replay_recorded_frames() {
    let recorded = "\
0: [{\"x1\":80,\"y1\":200,\"x2\":120,\"y2\":320,\"p\":0.9}]
1: [{\"x1\":80,\"y1\":230,\"x2\":120,\"y2\":350,\"p\":0.9},{\"x1\":500,\"y1\":0,\"x2\":520,\"y2\":20,\"p\":0.1}]
2: [{\"x1\":80,\"y1\":260,\"x2\":120,\"y2\":380,\"p\":0.9}]
3: [{\"x1\":80,\"y1\":290,\"x2\":120,\"y2\":410,\"p\":0.9}]
";
    let mut pipeline = Pipeline::new(&Config::default()).unwrap();

    for frame in FrameReader::new(recorded.as_bytes()) {
        pipeline.process(&frame.unwrap().detections);
    }

    // centres 260 -> 290 -> 320 -> 350 across line 300
    assert_eq!(pipeline.frames_processed(), 4);
    assert_eq!(pipeline.stats().entered, 1);
    assert_eq!(pipeline.tracker().stats().next_id, 1);
}
