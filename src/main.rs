use eframe::egui;
use hatstack::app::HatStackApp;

fn main() -> Result<(), eframe::Error> {
    // Initialize session log (overwrites previous session log)
    hatstack::logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("HatStack"),
        ..Default::default()
    };

    eframe::run_native(
        "HatStack",
        options,
        Box::new(|cc| Box::new(HatStackApp::new(cc))),
    )
}
