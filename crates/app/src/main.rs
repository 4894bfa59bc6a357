use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

mod app;
mod hud;
mod station;
mod trace;

fn main() -> eframe::Result<()> {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Energy Lab"),
        ..Default::default()
    };
    eframe::run_native(
        "Energy Lab",
        options,
        Box::new(|_cc| Ok(Box::new(app::EnergyLabApp::new()))),
    )
}
