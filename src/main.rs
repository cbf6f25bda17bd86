//! Headless demo: annotates two synthetic images, then writes the rendered
//! frame, the saved annotation lists and the export archive.
//!
//! Usage: `bbox-annotator-demo [OUTPUT_DIR]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bbox_annotator::AnnotatorConfig;

    let first_run = AnnotatorConfig::default_path().is_some_and(|path| !path.exists());
    let config = AnnotatorConfig::load_from_default_path().unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    // Leave an editable config behind on first run
    if first_run {
        if let Err(e) = config.save_to_default_path() {
            log::warn!("Could not write default config: {}", e);
        }
    }

    let out_dir = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("bbox-annotator-demo"));

    if let Err(e) = demo::run(&config, &out_dir) {
        eprintln!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

// The demo needs a filesystem
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::fs::File;
    use std::io::{BufWriter, Cursor, Write};
    use std::path::Path;

    use image::{Rgba, RgbaImage};

    use bbox_annotator::export::{archive_filename, coco_dataset, write_archive};
    use bbox_annotator::persist::DirectorySink;
    use bbox_annotator::{
        AnnotationSession, AnnotationSink, AnnotatorConfig, CategoryAssigner, CategoryChoice,
        ControllerOutput, Image, Project, RasterSurface, Result, SessionCommand,
    };

    /// Gradient stand-in for a photo.
    fn backdrop(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Rgba([r / 2 + 64, g / 2 + 64, 160, 255])
        })
    }

    fn png_bytes(image: &RgbaImage) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    fn dispatch(commands: Vec<SessionCommand>, sink: &mut dyn AnnotationSink) -> Result<()> {
        for command in commands {
            match command {
                SessionCommand::Persist(request) => {
                    sink.save(request)?;
                }
                SessionCommand::Navigate(route) => log::info!("Navigate to {:?}", route),
            }
        }
        Ok(())
    }

    fn report(outputs: &[ControllerOutput]) {
        for output in outputs {
            match output {
                ControllerOutput::ShowPopup(popup) => {
                    log::info!("Popup '{}' at {:?}", popup.title(), popup.anchor);
                }
                ControllerOutput::AnnotationsChanged(list) => log::debug!("{} boxes", list.len()),
                ControllerOutput::HidePopup => {}
            }
        }
    }

    pub fn run(config: &AnnotatorConfig, out_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(out_dir)?;
        let mut sink = DirectorySink::new(out_dir.join("saved"))?;

        let categories = CategoryAssigner::default().parse_class_list("car;person")?;
        let project = Project::new("Demo Streets").with_categories(categories);
        let images = vec![
            Image::new("memory://street.png", "street.png", 800, 600),
            Image::new("memory://crossing.png", "crossing.png", 1024, 768),
        ];
        let sources: Vec<RgbaImage> = images.iter().map(|img| backdrop(img.width, img.height)).collect();

        let mut session = AnnotationSession::with_config(project, images, config)?;
        let (width, height) = session.display_size();
        let mut surface = RasterSurface::with_backdrop(backdrop(width as u32, height as u32));

        {
            let mut board = session.bind(&mut surface);

            // Existing category
            board.pointer_down(100.0, 100.0)?;
            board.pointer_move(300.0, 250.0)?;
            report(&board.pointer_up()?);
            report(&board.choose(CategoryChoice::Existing("car".into()))?);

            // Same category again, tagged car2
            board.pointer_down(420.0, 120.0)?;
            board.pointer_move(560.0, 220.0)?;
            report(&board.pointer_up()?);
            report(&board.choose(CategoryChoice::Existing("car".into()))?);

            // New category typed by the user
            board.pointer_down(600.0, 60.0)?;
            board.pointer_move(720.0, 330.0)?;
            report(&board.pointer_up()?);
            report(&board.choose(CategoryChoice::CreateNew)?);
            report(&board.submit_name(Some("Bicycle"))?);

            // Too small, dropped
            board.pointer_down(50.0, 50.0)?;
            board.pointer_move(52.0, 80.0)?;
            report(&board.pointer_up()?);

            for entry in board.session().annotation_list() {
                log::info!("{} ({})", entry.tag.as_deref().unwrap_or("?"), entry.color);
            }
        }
        surface.save_png(out_dir.join("frame.png"))?;

        let commands = session.next_image(&mut surface)?;
        dispatch(commands, &mut sink)?;
        {
            let mut board = session.bind(&mut surface);
            board.pointer_down(200.0, 150.0)?;
            board.pointer_move(400.0, 300.0)?;
            board.pointer_up()?;
            board.choose(CategoryChoice::Existing("person".into()))?;
        }

        let dataset = coco_dataset(session.project(), &session.snapshot_images());
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        for (img, pixels) in session.images().iter().zip(&sources) {
            files.push((img.filename.clone(), png_bytes(pixels)?));
        }
        let entries: Vec<(&str, &[u8])> = files.iter().map(|(n, b)| (n.as_str(), b.as_slice())).collect();
        let archive_path = out_dir.join(archive_filename(session.project()));
        let mut writer = write_archive(BufWriter::new(File::create(&archive_path)?), &dataset, &entries)?;
        writer.flush()?;
        log::info!("Wrote {:?}", archive_path);

        let commands = session.finish(&mut surface)?;
        dispatch(commands, &mut sink)?;
        println!("Demo output written to {}", out_dir.display());
        Ok(())
    }
}
