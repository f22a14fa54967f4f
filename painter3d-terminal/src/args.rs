use clap::Parser;
use nalgebra::Vector3;
use painter3d_core::CameraConfig;
use std::path::PathBuf;

/// Flat-shaded software 3D renderer for the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "painter3d-terminal", author, version, about, long_about = None)]
pub struct Args {
    /// Mesh to render (.obj or .stl); a cube is shown when omitted
    pub mesh: Option<PathBuf>,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 70.0)]
    pub fov: f32,

    /// Near clip distance
    #[arg(long, default_value_t = 0.1)]
    pub near: f32,

    /// Far clip distance
    #[arg(long, default_value_t = 1000.0)]
    pub far: f32,

    /// Direction towards the light as "x,y,z"
    #[arg(long, default_value = "-1,1,-1", value_parser = parse_vec3, allow_hyphen_values = true)]
    pub light: Vector3<f32>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Log file (the terminal itself is used for drawing)
    #[arg(long, default_value = "painter3d.log")]
    pub log_file: PathBuf,
}

impl Args {
    pub fn camera_config(&self) -> Result<CameraConfig, String> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(format!("fov must be between 0 and 180 degrees, got {}", self.fov));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(format!(
                "expected 0 < near < far, got near {} and far {}",
                self.near, self.far
            ));
        }

        Ok(CameraConfig {
            fov: self.fov,
            near: self.near,
            far: self.far,
        })
    }
}

pub fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("Expected 3 comma-separated values".to_string());
    }

    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("Invalid number '{}': {}", part, e))?;
    }

    let v = Vector3::from(values);
    if v.norm() == 0.0 {
        return Err("Direction must not be zero".to_string());
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["painter3d-terminal"]);
        assert!(args.mesh.is_none());
        assert_eq!(args.camera_config().unwrap(), CameraConfig::default());
        assert_eq!(args.light, Vector3::new(-1.0, 1.0, -1.0));
        assert_eq!(args.fps, 30);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "painter3d-terminal",
            "monke.obj",
            "--fov",
            "90",
            "--light",
            "0,-1,0",
        ]);
        assert_eq!(args.mesh, Some(PathBuf::from("monke.obj")));
        assert_eq!(args.camera_config().unwrap().fov, 90.0);
        assert_eq!(args.light, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_invalid_lens() {
        let args = Args::parse_from(["painter3d-terminal", "--near", "5", "--far", "2"]);
        assert!(args.camera_config().is_err());
    }

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3(" 1, 2 ,3").unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,3").is_err());
        assert!(parse_vec3("0,0,0").is_err());
    }
}
