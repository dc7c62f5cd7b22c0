//! Boundary between feature sources and the tree builder.
//!
//! Records arriving from a database query or a file are decoded once into
//! [`WeightedBox`] and turned into a [`FeatureSet`]. The set is where the
//! builder's ordering contract is enforced: features are sorted by
//! descending weight so that heavier features stay in coarser tiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{aggregate_extent, BoundingBox, BoundingBox3D, Feature, TilingError};

/// One input record: an identified 3D box with an optional importance
/// weight.
///
/// When `weight` is absent the footprint area of the box is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedBox {
    pub id: String,
    pub xmin: f64,
    pub ymin: f64,
    pub zmin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub zmax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl WeightedBox {
    pub fn new(id: impl Into<String>, min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            id: id.into(),
            xmin: min[0],
            ymin: min[1],
            zmin: min[2],
            xmax: max[0],
            ymax: max[1],
            zmax: max[2],
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Validates the record and resolves its effective weight.
    fn into_weighted(self) -> Result<(BoundingBox3D, f64), TilingError> {
        let bbox = BoundingBox3D::try_new(
            self.id,
            [self.xmin, self.ymin, self.zmin],
            [self.xmax, self.ymax, self.zmax],
        )?;
        let weight = self.weight.unwrap_or_else(|| bbox.footprint_area());
        if !weight.is_finite() {
            return Err(TilingError::invalid(format!(
                "feature '{}' has a non-finite weight",
                bbox.id()
            )));
        }
        Ok((bbox, weight))
    }
}

/// A validated, importance-ordered collection of features ready to be
/// tiled.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    features: Vec<Feature>,
    index: HashMap<String, usize>,
    extent: Option<BoundingBox>,
}

impl FeatureSet {
    /// Builds a set from weighted records, ordered by descending weight.
    ///
    /// The sort is stable: records with equal weight keep their incoming
    /// order.
    pub fn from_weighted<I>(records: I) -> Result<Self, TilingError>
    where
        I: IntoIterator<Item = WeightedBox>,
    {
        let mut weighted = records
            .into_iter()
            .map(WeightedBox::into_weighted)
            .collect::<Result<Vec<_>, _>>()?;
        weighted.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        Self::assemble(weighted.into_iter().map(|(bbox, _)| bbox))
    }

    /// Builds a set from boxes that the caller has already ordered by
    /// descending importance. The order is kept as given.
    pub fn from_presorted<I>(boxes: I) -> Result<Self, TilingError>
    where
        I: IntoIterator<Item = BoundingBox3D>,
    {
        let boxes = boxes
            .into_iter()
            .map(|bbox| {
                bbox.validate()?;
                Ok(bbox)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::assemble(boxes)
    }

    fn assemble<I>(boxes: I) -> Result<Self, TilingError>
    where
        I: IntoIterator<Item = BoundingBox3D>,
    {
        let mut features = Vec::new();
        let mut index = HashMap::new();

        for bbox in boxes {
            if index.contains_key(bbox.id()) {
                return Err(TilingError::DuplicateId(bbox.id().to_owned()));
            }
            index.insert(bbox.id().to_owned(), features.len());
            features.push(Feature::new(bbox));
        }

        let extent = aggregate_extent(features.iter().map(Feature::bounding_box));
        tracing::debug!(features = features.len(), ?extent, "feature set assembled");

        Ok(Self {
            features,
            index,
            extent,
        })
    }

    /// Features in importance order.
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The 2D extent spanning every feature box, `None` for an empty set.
    #[inline]
    pub fn extent(&self) -> Option<BoundingBox> {
        self.extent
    }

    /// Looks up a feature by id.
    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.index.get(id).map(|&i| &self.features[i])
    }
}
