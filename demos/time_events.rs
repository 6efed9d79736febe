use std::cell::RefCell;
use std::rc::Rc;

use frameflow::{
    Driver, DriverOpts, Fps, FnScene, FrameIndex, Project, ProjectSettings, TaskExt,
    wait_until,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let project = Project::new(ProjectSettings {
        name: "time-events".to_owned(),
        fps: Fps::whole(24)?,
    })?;
    let scene = FnScene::new(
        "cue",
        || (),
        |_: &Rc<RefCell<()>>| vec![wait_until("cue").named("wait-for-cue").boxed()],
        |_: &(), frame| frame,
    );
    let mut driver = Driver::new(project, scene, DriverOpts::default());

    // Without timeline edits the event fires where it is first reached.
    println!("unscheduled: {} frames", driver.duration(10_000)?);

    // Timeline tooling moves the cue to two seconds in.
    let at = driver.project().seconds_to_frames(2.0).max(0) as u64;
    driver.project_mut().events_mut().set_target("cue", FrameIndex(at));
    println!("cue at 2s: {} frames", driver.duration(10_000)?);

    let fps = driver.project().fps();
    println!("{}", driver.project().events().to_json(fps)?);
    Ok(())
}
