//! TorchScript detector backed by libtorch.

use crate::{common::*, detector::Detector};
use image::imageops::FilterType;
use tch::{CModule, Device, IValue, Kind, Tensor};

/// A TorchScript module taking a `[1, 3, H, W]` float image in `[0, 1]`.
pub struct TorchScriptDetector {
    module: CModule,
    device: Device,
    image_size: u32,
}

impl TorchScriptDetector {
    pub fn load(path: impl AsRef<Path>, device: Device, image_size: u32) -> Result<Self> {
        let path = path.as_ref();
        ensure!(image_size > 0, "image_size must be positive");

        let mut module = CModule::load_on_device(path, device)
            .with_context(|| format!("failed to load TorchScript module '{}'", path.display()))?;
        module.set_eval();

        Ok(Self {
            module,
            device,
            image_size,
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    fn to_input(&self, image: &DynamicImage) -> Tensor {
        let size = self.image_size;
        let image = image
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8();
        let size = size as i64;

        Tensor::of_slice(image.as_raw())
            .view([size, size, 3])
            .permute(&[2, 0, 1])
            .to_kind(Kind::Float)
            / 255.0
    }
}

impl Detector for TorchScriptDetector {
    fn infer(&mut self, image: &DynamicImage) -> Result<()> {
        let input = self.to_input(image).unsqueeze(0).to_device(self.device);
        let module = &self.module;
        let _output = tch::no_grad(|| module.forward_is(&[IValue::Tensor(input)]))?;

        // wait for queued kernels so the caller times the whole call
        if let Device::Cuda(index) = self.device {
            tch::Cuda::synchronize(index as i64);
        }

        Ok(())
    }

    fn parameter_numels(&self) -> Result<Vec<usize>> {
        let numels = self
            .module
            .named_parameters()?
            .iter()
            .map(|(_name, tensor)| tensor.numel())
            .collect();
        Ok(numels)
    }
}
