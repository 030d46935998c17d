use roverkin_world::{RoverBuilder, SimConfig};

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut cfg = SimConfig::default();
    cfg.debug.log_every = 30;
    let mut rover = RoverBuilder::new().with_config(cfg).build_procedural();

    for step in 0..600 {
        let s = rover.advance(1.0 / 30.0);
        if step % 60 == 0 {
            println!("step {step:03}  x={:+.2} y={:+.3} pitch={:+.3} roll={:+.3}  rockers=({:+.3},{:+.3})  {}",
                     s.pose.position.x, s.pose.position.y, s.pose.pitch, s.pose.roll,
                     s.suspension.left, s.suspension.right, s.phase_label);
        }
    }
    println!("final hash = {:02x?}", rover.step_hash());
}
