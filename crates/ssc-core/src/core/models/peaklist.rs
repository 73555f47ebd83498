use super::filter::ShiftRangeFilter;
use super::ids::PeakId;
use super::peak::{Peak, PeakError};
use crate::core::io::format::PeakListFormat;
use slotmap::SlotMap;
use std::ops::Index;

/// An ordered collection of [`Peak`]s sharing one dimension-label schema.
///
/// Peaks live in an arena keyed by [`PeakId`]; membership tests elsewhere in the
/// crate use these ids, so peaks with identical coordinates stay distinguishable.
/// Every peak in the list carries exactly the list's labels, in the same order.
#[derive(Debug, Clone)]
pub struct PeakList {
    /// Identifier of the data this list was read from (usually its path).
    source: Option<String>,
    /// Type of the NMR experiment (e.g., "HNCO", "HSQC").
    spectrum_type: String,
    /// Dimension labels shared by every peak.
    labels: Vec<String>,
    /// Format the list was read from or will be written as.
    format: PeakListFormat,
    /// Arena storage for peaks.
    peaks: SlotMap<PeakId, Peak>,
    /// Peak ids in list order.
    order: Vec<PeakId>,
}

impl PeakList {
    pub fn new(spectrum_type: &str, labels: Vec<String>, format: PeakListFormat) -> Self {
        Self {
            source: None,
            spectrum_type: spectrum_type.to_string(),
            labels,
            format,
            peaks: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Builds a list from already constructed peaks.
    ///
    /// # Errors
    ///
    /// Returns [`PeakError::SchemaMismatch`] for the first peak whose labels differ
    /// from `labels`.
    pub fn from_peaks(
        spectrum_type: &str,
        labels: Vec<String>,
        format: PeakListFormat,
        peaks: impl IntoIterator<Item = Peak>,
    ) -> Result<Self, PeakError> {
        let mut list = Self::new(spectrum_type, labels, format);
        for peak in peaks {
            list.push(peak)?;
        }
        Ok(list)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Appends a peak and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`PeakError::SchemaMismatch`] if the peak's labels are not the list's labels.
    pub fn push(&mut self, peak: Peak) -> Result<PeakId, PeakError> {
        if !peak.matches_labels(&self.labels) {
            return Err(PeakError::SchemaMismatch {
                expected: self.labels.clone(),
                found: peak.labels().map(str::to_string).collect(),
            });
        }
        let id = self.peaks.insert(peak);
        self.order.push(id);
        Ok(id)
    }

    pub fn get(&self, id: PeakId) -> Option<&Peak> {
        self.peaks.get(id)
    }

    pub fn contains(&self, id: PeakId) -> bool {
        self.peaks.contains_key(id)
    }

    /// Peak ids in list order.
    pub fn ids(&self) -> &[PeakId] {
        &self.order
    }

    /// Iterates over `(PeakId, &Peak)` pairs in list order.
    pub fn iter(&self) -> impl Iterator<Item = (PeakId, &Peak)> {
        self.order.iter().map(move |&id| (id, &self.peaks[id]))
    }

    pub fn peaks(&self) -> impl Iterator<Item = &Peak> {
        self.order.iter().map(move |&id| &self.peaks[id])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn spectrum_type(&self) -> &str {
        &self.spectrum_type
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn format(&self) -> PeakListFormat {
        self.format
    }

    /// Creates a new, independent list holding copies of the selected peaks in the
    /// order given. Ids that do not belong to this list are skipped.
    ///
    /// The new list keeps the schema, spectrum type and format but has no source;
    /// its peaks receive fresh ids.
    pub fn select(&self, ids: &[PeakId]) -> PeakList {
        let mut subset = Self::new(&self.spectrum_type, self.labels.clone(), self.format);
        for &id in ids {
            if let Some(peak) = self.peaks.get(id) {
                let new_id = subset.peaks.insert(peak.clone());
                subset.order.push(new_id);
            }
        }
        subset
    }

    /// Returns a new list containing only the peaks accepted by every filter.
    /// The source identifier is preserved.
    pub fn filtered(&self, filters: &[ShiftRangeFilter]) -> PeakList {
        let kept: Vec<PeakId> = self
            .iter()
            .filter(|(_, peak)| filters.iter().all(|f| f.accepts(peak)))
            .map(|(id, _)| id)
            .collect();
        let mut subset = self.select(&kept);
        subset.source = self.source.clone();
        subset
    }
}

impl Index<PeakId> for PeakList {
    type Output = Peak;

    fn index(&self, id: PeakId) -> &Self::Output {
        &self.peaks[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["HN".to_string(), "N".to_string()]
    }

    fn peak(h: f64, n: f64) -> Peak {
        Peak::unassigned(&labels(), &[h, n], Vec::new()).unwrap()
    }

    fn sample_list() -> PeakList {
        PeakList::from_peaks(
            "HSQC",
            labels(),
            PeakListFormat::Json,
            vec![peak(8.0, 120.0), peak(8.0, 120.0), peak(7.5, 115.0)],
        )
        .unwrap()
        .with_source("sample.json")
    }

    #[test]
    fn push_preserves_insertion_order() {
        let list = sample_list();
        let shifts: Vec<_> = list.peaks().map(|p| p.shifts()).collect();
        assert_eq!(
            shifts,
            vec![vec![8.0, 120.0], vec![8.0, 120.0], vec![7.5, 115.0]]
        );
        assert_eq!(list.len(), 3);
        assert_eq!(list.source(), Some("sample.json"));
    }

    #[test]
    fn identical_peaks_receive_distinct_ids() {
        let list = sample_list();
        let ids = list.ids();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(list[ids[0]], list[ids[1]]);
    }

    #[test]
    fn push_rejects_peak_with_foreign_schema() {
        let mut list = PeakList::new("HSQC", labels(), PeakListFormat::Json);
        let other = Peak::unassigned(&["CA".to_string()], &[55.0], Vec::new()).unwrap();
        assert!(matches!(
            list.push(other),
            Err(PeakError::SchemaMismatch { .. })
        ));
        assert!(list.is_empty());
    }

    #[test]
    fn select_builds_independent_subset_in_requested_order() {
        let list = sample_list();
        let ids = list.ids().to_vec();
        let subset = list.select(&[ids[2], ids[0]]);

        assert_eq!(subset.len(), 2);
        assert_eq!(subset.labels(), list.labels());
        assert_eq!(subset.spectrum_type(), "HSQC");
        assert_eq!(subset.source(), None);
        let shifts: Vec<_> = subset.peaks().map(|p| p.shifts()).collect();
        assert_eq!(shifts, vec![vec![7.5, 115.0], vec![8.0, 120.0]]);
    }

    #[test]
    fn filtered_drops_out_of_range_peaks_and_keeps_source() {
        let list = sample_list();
        let filters = vec![ShiftRangeFilter::new("N", 116.0, 125.0)];
        let filtered = list.filtered(&filters);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.source(), Some("sample.json"));
        assert!(filtered.peaks().all(|p| p.value("N") == Some(120.0)));
    }
}
