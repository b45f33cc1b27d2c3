use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-width-height format, contains left top corner and width-height
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ltwh;
impl BBoxFormat for Ltwh {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox<F: BBoxFormat>([f32; 4], PhantomData<F>);

impl<F: BBoxFormat> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }

    // Use carefully when you REALLY sure that slice have needed format
    #[inline(always)]
    pub fn assigned(slice: &[f32; 4]) -> Self {
        BBox(*slice, Default::default())
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl BBox<Ltwh> {
    #[inline]
    pub fn ltwh(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn as_ltrb(&self) -> BBox<Ltrb> {
        self.into()
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline]
    pub fn as_ltwh(&self) -> BBox<Ltwh> {
        self.into()
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    /// Horizontal center of the box
    #[inline(always)]
    pub fn center_x(&self) -> f32 {
        (self.0[0] + self.0[2]) / 2.0
    }

    /// A box is usable when every coordinate is finite and the corners are not swapped.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.right() >= self.left() && self.bottom() >= self.top()
    }
}

impl<'a> From<&'a BBox<Ltwh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Ltwh>) -> Self {
        Self(
            [v.0[0], v.0[1], v.0[2] + v.0[0], v.0[3] + v.0[1]],
            Default::default(),
        )
    }
}

impl<'a> From<&'a BBox<Ltrb>> for BBox<Ltwh> {
    #[inline]
    fn from(v: &'a BBox<Ltrb>) -> Self {
        Self(
            [v.0[0], v.0[1], v.0[2] - v.0[0], v.0[3] - v.0[1]],
            Default::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ltwh_converts_to_ltrb() {
        let bbox = BBox::ltwh(10.0, 20.0, 30.0, 40.0).as_ltrb();

        assert_eq!(bbox.as_slice(), &[10.0, 20.0, 40.0, 60.0]);
        assert_eq!(bbox.center_x(), 25.0);
        assert_eq!(bbox.bottom(), 60.0);
        assert_eq!(bbox.as_ltwh(), BBox::ltwh(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn validity() {
        assert!(BBox::ltrb(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(BBox::ltrb(5.0, 5.0, 5.0, 5.0).is_valid());
        assert!(!BBox::ltrb(f32::NAN, 0.0, 10.0, 10.0).is_valid());
        assert!(!BBox::ltrb(0.0, 0.0, f32::INFINITY, 10.0).is_valid());
        assert!(!BBox::ltrb(10.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!BBox::ltrb(0.0, 10.0, 10.0, 0.0).is_valid());
    }
}
