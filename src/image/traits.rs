/// Read access to a row-major 2D pixel buffer.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Contiguous row-major pixel storage.
    fn as_slice(&self) -> &[Self::Pixel];

    #[inline]
    fn shape(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    fn len(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn row(&self, y: usize) -> &[Self::Pixel] {
        let w = self.width();
        &self.as_slice()[y * w..(y + 1) * w]
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }
}

/// Write access to a row-major 2D pixel buffer.
pub trait ImageViewMut: ImageView {
    fn as_mut_slice(&mut self) -> &mut [Self::Pixel];

    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel] {
        let w = self.width();
        &mut self.as_mut_slice()[y * w..(y + 1) * w]
    }

    fn fill(&mut self, value: Self::Pixel) {
        self.as_mut_slice().fill(value);
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
