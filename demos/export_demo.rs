use std::cell::RefCell;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use frameflow::{
    Action, Driver, DriverOpts, ExportOpts, Fps, FnScene, JsonLinesSink, Project,
    ProjectSettings, TaskExt, all, chain, export, sequence, tween, wait_for,
};

#[derive(Clone, Debug, Default, serde::Serialize)]
struct Bars {
    heights: [f64; 3],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Three bars grow one after another, hold, then shrink together.
    let scene = FnScene::new(
        "bars",
        Bars::default,
        |bars: &Rc<RefCell<Bars>>| {
            let grow = sequence(
                0.25,
                (0..3).map(|i| {
                    let bars = bars.clone();
                    tween(0.5, move |p| bars.borrow_mut().heights[i] = p).boxed()
                }),
            );
            let shrink = all((0..3).map(|i| {
                let bars = bars.clone();
                tween(0.5, move |p| bars.borrow_mut().heights[i] = 1.0 - p).boxed()
            }));
            vec![
                chain([
                    Action::task(grow),
                    Action::task(wait_for(0.5)),
                    Action::task(shrink),
                ])
                .boxed(),
            ]
        },
        |bars: &Bars, _| bars.clone(),
    );

    let project = Project::new(ProjectSettings {
        name: "export-demo".to_owned(),
        fps: Fps::whole(30)?,
    })?;
    let mut driver = Driver::new(project, scene, DriverOpts::default());

    let out_dir = Path::new("target/frameflow_demos");
    fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join("bars.jsonl");

    let mut sink = JsonLinesSink::new(BufWriter::new(fs::File::create(&out_path)?));
    let stats = export(&mut driver, ExportOpts::default(), &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_written,
        out_path.display()
    );
    Ok(())
}
