#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([480.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Quiz de Vocabulario",
        native_options,
        Box::new(|cc| Ok(Box::new(vocab_quiz::QuizApp::new(cc)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast as _;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No hay window")
            .document()
            .expect("No hay document");
        let canvas = document
            .get_element_by_id("quiz_canvas")
            .expect("Falta el canvas #quiz_canvas en el HTML")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("#quiz_canvas no es un canvas");

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(vocab_quiz::QuizApp::new(cc)))),
            )
            .await
            .expect("no se pudo arrancar eframe");
    });
}
