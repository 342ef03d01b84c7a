//! Cluster colouring for map output.

use crate::cluster::ClusterResult;
use crate::error::{Error, Result};
use ndarray::ArrayView1;

/// A sink for coloured, labelled points (e.g. a map layer).
pub trait Renderer {
    /// Draw one point.
    fn draw(&mut self, point: ArrayView1<'_, f64>, label: usize, color: &str);
}

/// Colours assigned to cluster labels, cycling when there are more labels
/// than colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

/// ColorBrewer "Dark2", 8 qualitative colours.
const DARK2: [&str; 8] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

impl Palette {
    /// Palette from explicit colours.
    pub fn new(colors: Vec<String>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::InvalidParameter {
                name: "colors",
                message: "palette needs at least one colour",
            });
        }
        Ok(Self { colors })
    }

    /// The 8-colour Dark2 palette.
    pub fn dark2() -> Self {
        Self {
            colors: DARK2.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Colour for `label`.
    pub fn color(&self, label: usize) -> &str {
        &self.colors[label % self.colors.len()]
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false: construction rejects an empty palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark2()
    }
}

/// Feed every point of `result` to `renderer` with its cluster colour.
pub fn render<R>(result: &ClusterResult, palette: &Palette, renderer: &mut R)
where
    R: Renderer + ?Sized,
{
    for (point, label) in result.labeled_points() {
        renderer.draw(point, label, palette.color(label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::EqualSizeKmeans;

    #[derive(Default)]
    struct Collect {
        drawn: Vec<(Vec<f64>, usize, String)>,
    }

    impl Renderer for Collect {
        fn draw(&mut self, point: ArrayView1<'_, f64>, label: usize, color: &str) {
            self.drawn.push((point.to_vec(), label, color.to_string()));
        }
    }

    #[test]
    fn test_palette_wraps() {
        let p = Palette::dark2();
        assert_eq!(p.len(), 8);
        assert_eq!(p.color(0), "#1b9e77");
        assert_eq!(p.color(8), p.color(0));
        assert_eq!(p.color(11), p.color(3));
        assert!(Palette::new(vec![]).is_err());
    }

    #[test]
    fn test_render_every_point() {
        let data: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, 0.0]).collect();
        let result = EqualSizeKmeans::new(2)
            .with_seed(9)
            .with_rounds(2)
            .fit(&data)
            .unwrap();

        let palette = Palette::new(vec!["red".into(), "blue".into()]).unwrap();
        let mut sink = Collect::default();
        render(&result, &palette, &mut sink);

        assert_eq!(sink.drawn.len(), 6);
        for (i, (point, label, color)) in sink.drawn.iter().enumerate() {
            assert_eq!(point, &data[i]);
            assert_eq!(*label, result.labels()[i]);
            assert_eq!(color, palette.color(*label));
        }
    }
}
