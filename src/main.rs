use std::path::PathBuf;

use anyhow::Context;
use focal_mosaic::camera_geom::model::{make_grid_camera, GridCameraSpec};
use focal_mosaic::camera_geom::{
    show_camera, write_tiff_file, CameraMosaicBuilder, DisplayConfig, LoggingSink, MosaicConfig, StandardTiffWriter,
    TiffCompression, TiffConfig,
};
use focal_mosaic::logger;

use tracing::info;

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting focal_mosaic...");

    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("camera_mosaic.tiff"));

    let camera = make_grid_camera(&GridCameraSpec {
        name: "demo".to_string(),
        rotate_detectors: true,
        ..GridCameraSpec::default()
    })
    .context("building the demo camera")?;
    info!("Camera {} with {} detectors", camera.name(), camera.len());

    let config = MosaicConfig::builder().bin_size(4).buffer_size(10).build();
    let builder = CameraMosaicBuilder::new(config);
    info!("Bin size: {}", builder.config().bin_size);

    let mosaic = show_camera::<u16, _, _>(
        &camera,
        builder.config(),
        builder.source(),
        &mut LoggingSink,
        &DisplayConfig::default(),
    )
    .context("assembling the camera mosaic")?;
    for placement in mosaic.placements() {
        info!(
            "{}: {:?} ({} quarter turns)",
            placement.name, placement.bbox, placement.n_quarter
        );
    }

    let tiff_config = TiffConfig::builder().compression(TiffCompression::DeflateBalanced).build();
    write_tiff_file(&StandardTiffWriter, mosaic.image(), &output, &tiff_config)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("Mosaic written to {}", output.display());

    Ok(())
}
