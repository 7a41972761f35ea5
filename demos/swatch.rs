// Renders a flat patch of cloth under a directional light and a uniform sky.
// The patch fills the whole image and is seen by an orthographic camera, so no ray tracing
// is needed. It's just to demonstrate how to use this library.
use std::error::Error;

use rayon::prelude::*;
use woven::{Cloth, ClothConfig, PatternTable, RgbD, RgbF, SurfacePoint, Vec2d, Vec3d, BSDF};

const IMAGE_SIZE: (usize, usize) = (512, 512);
const NUM_SAMPLES: usize = 16;
const TILES: f64 = 12.0;

fn save_image(
    path: &std::path::Path,
    buffer: &[u8],
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(&mut writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_source_gamma(png::ScaledFloat::new(1.0 / 2.2));

    let source_chromaticities = png::SourceChromaticities::new(
        (0.31270, 0.32900),
        (0.64000, 0.33000),
        (0.30000, 0.60000),
        (0.15000, 0.06000),
    );

    encoder.set_source_chromaticities(source_chromaticities);
    let mut writer = encoder.write_header()?;

    writer.write_image_data(buffer)?;
    Ok(())
}

fn shade(cloth: &Cloth, uv: Vec2d, rd: &mut fastrand::Rng) -> RgbD {
    let omega_o = Vec3d::new(0.0, -0.5, 1.0).normalize();
    let light_direction = Vec3d::new(0.4, 0.6, 0.7).normalize();
    let light = RgbD::new(1.0, 0.95, 0.9) * 2.5;
    let sky = RgbD::new(0.5, 0.6, 0.7) * 0.3;

    let point = cloth.at(SurfacePoint::flat(uv));

    // eval already contains the cosine term
    let mut color = point.eval(omega_o, light_direction) * light;

    // the sampled bsdf carries the specular term without pdf compensation
    let mut sky_sum = RgbD::ZERO;
    for _ in 0..NUM_SAMPLES {
        let response = point.sample_incoming(omega_o, Vec2d::new(rd.f64(), rd.f64()));
        if response.pdf > 0.0 {
            sky_sum += response.bsdf * response.omega_i.z / response.pdf * sky;
        }
    }
    color += sky_sum / NUM_SAMPLES as f64;
    color
}

fn main() -> Result<(), Box<dyn Error>> {
    let warp = RgbF::new(0.75, 0.2, 0.15);
    let weft = RgbF::new(0.9, 0.85, 0.6);
    #[rustfmt::skip]
    let twill = [
        true, true, false, false,
        false, true, true, false,
        false, false, true, true,
        true, false, false, true,
    ];
    let pattern = PatternTable::from_weave(4, 4, &twill, warp, weft)?;

    let cloth = Cloth::new(
        ClothConfig {
            reflectance: RgbF::ONE,
            intensity_fineness: 2.0,
            ..ClothConfig::default()
        },
        pattern,
    )?;
    println!(
        "specular normalization: {}",
        cloth.specular_normalization()
    );

    let (width, height) = IMAGE_SIZE;
    let mut image: Vec<u8> = vec![0; 3 * width * height];

    image
        .par_chunks_mut(3 * width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rd = fastrand::Rng::with_seed(y as u64);
            for x in 0..width {
                let mut color = RgbD::ZERO;
                for _ in 0..NUM_SAMPLES {
                    let uv = Vec2d::new(
                        (x as f64 + rd.f64()) / width as f64,
                        (y as f64 + rd.f64()) / height as f64,
                    ) * TILES;
                    color += shade(&cloth, uv, &mut rd);
                }
                color /= NUM_SAMPLES as f64;

                row[x * 3] = (color.x * 255.0).clamp(0.0, 255.0).floor() as u8;
                row[x * 3 + 1] = (color.y * 255.0).clamp(0.0, 255.0).floor() as u8;
                row[x * 3 + 2] = (color.z * 255.0).clamp(0.0, 255.0).floor() as u8;
            }
        });

    save_image(
        std::path::Path::new("swatch.png"),
        &image,
        width as u32,
        height as u32,
    )
}
