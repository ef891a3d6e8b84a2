use roast_hardware::SimulatedRoaster;
use roast_traits::Transport;
use std::time::Duration;

fn drain(dev: &mut SimulatedRoaster) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(l) = dev.read_line(Duration::from_millis(1)).unwrap() {
        lines.push(String::from_utf8(l).unwrap());
    }
    lines
}

#[test]
fn rounds_report_monotone_time_and_crack_stages() {
    let mut dev = SimulatedRoaster::new(120);
    let mut last_time = -1i64;
    let mut last_stage = 0i32;

    for _ in 0..120 {
        dev.write(b"s").unwrap();
        let lines = drain(&mut dev);
        let time_line = lines
            .iter()
            .find(|l| l.starts_with("Time "))
            .expect("round has a Time line");
        let t: i64 = time_line.split_whitespace().last().unwrap().parse().unwrap();
        assert!(t > last_time, "time must advance ({t} after {last_time})");
        last_time = t;

        let crack_line = lines
            .iter()
            .find(|l| l.starts_with("Crack "))
            .expect("round has a Crack line");
        let stage: i32 = crack_line.split_whitespace().nth(1).unwrap().parse().unwrap();
        assert!(stage >= last_stage, "crack stage never goes backwards");
        last_stage = stage;
    }
    // A two-hour simulated roast reaches first crack.
    assert!(last_stage >= 1, "hot ramp should pass first crack");
    assert_eq!(dev.rounds_emitted(), 120);
}

#[test]
fn hot_junction_approaches_its_limit() {
    let mut dev = SimulatedRoaster::new(400);
    let mut last_hot = 0.0f64;
    for _ in 0..400 {
        dev.write(b"s").unwrap();
        let lines = drain(&mut dev);
        let hot_line = lines.iter().find(|l| l.starts_with("Hot ")).unwrap();
        let hot: f64 = hot_line.split_whitespace().last().unwrap().parse().unwrap();
        assert!(hot > last_hot - 0.11, "hot trace must not collapse");
        assert!(hot <= 235.0, "hot trace stays at or under the element limit");
        last_hot = hot;
    }
    assert!(last_hot > 220.0, "long roast should approach the limit");
}

#[test]
fn start_and_stop_commands_are_tracked() {
    let mut dev = SimulatedRoaster::new(1);
    assert!(!dev.started());
    dev.write(b"g").unwrap();
    assert!(dev.started());
    dev.write(b"r1200").unwrap();
    dev.write(b"a").unwrap();
    assert!(dev.stopped());
}

#[test]
fn closed_device_rejects_io() {
    let mut dev = SimulatedRoaster::new(1);
    dev.close().unwrap();
    assert!(dev.write(b"s").is_err());
    assert!(dev.read_line(Duration::from_millis(1)).is_err());
    assert!(dev.bytes_available().is_err());
}
