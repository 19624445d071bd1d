use crate::common::*;

/// A model that runs inference on one image at a time.
pub trait Detector {
    /// Run inference on `image` and return once the output is ready.
    fn infer(&mut self, image: &DynamicImage) -> Result<()>;

    /// Element counts of the learnable parameter tensors.
    fn parameter_numels(&self) -> Result<Vec<usize>>;
}

impl<D> Detector for Box<D>
where
    D: Detector + ?Sized,
{
    fn infer(&mut self, image: &DynamicImage) -> Result<()> {
        (**self).infer(image)
    }

    fn parameter_numels(&self) -> Result<Vec<usize>> {
        (**self).parameter_numels()
    }
}
