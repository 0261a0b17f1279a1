// Clock event surface demo: a repeating timer, a cooldown (which keeps
// firing once it reaches zero), and a scheduled one-shot.

use stride_core::clock::{Clock, Timer};

fn main() {
    let mut clock = Clock::new();
    clock.add_timer(Timer {
        id: "spawn-wave".to_string(),
        duration: 1.0,
        remaining: 1.0,
        repeat: true,
    });
    clock.add_cooldown("dash", 0.75);
    clock.schedule("boss-intro", 2.0, None);

    for _ in 0..6 {
        let report = clock.tick(0.5);
        let fired: Vec<String> = report.fired.iter().map(ToString::to_string).collect();
        println!("t={:>4}: fired {:?}", report.time, fired);
    }
}
