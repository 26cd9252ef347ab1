//! Analysis stages downstream of the null model.
//!
//! 1. **Events** ([`events`]): empirical p-values, significant frames and
//!    segmentation of contiguous frames into events
//! 2. **Threshold** ([`threshold`]): pooled surrogate histogram cutoff and the
//!    thresholded edge matrix
//! 3. **Debias** ([`debias`]): activity mask and deconvolution hand-off

pub mod debias;
pub mod events;
pub mod threshold;

pub use debias::{activity_mask, debias, DeconvolutionFit, Deconvolver, LeastSquaresDeconvolver};
pub use events::{
    detect_events, empirical_p_values, segment_events, significant_frames, single_frame_events, Event, EventDetection,
};
pub use threshold::{pooled_surrogate_histogram, threshold_edge_matrix};
