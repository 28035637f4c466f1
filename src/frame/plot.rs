//! Box plot rendering of a [`crate::PumsFrame`], behind the `plotting` feature.

/// Domain-specific plot of a normalized table.
pub trait Plottable {
    /// Renders the numeric column as box plots grouped by the categorical label.
    fn plot(&self);
}

#[cfg(feature = "plotting")]
impl Plottable for crate::frame::pums_frame::PumsFrame {
    fn plot(&self) {
        use plotlars::{BoxPlot, Orientation, Plot, Text};

        let roles = self.roles();
        let title = format!("{} by {}", roles.numeric, roles.categorical);

        // Multi-year frames get one box per year within each label.
        match roles.year.as_deref() {
            Some(year) => BoxPlot::builder()
                .data(self.frame())
                .labels(roles.categorical.as_str())
                .values(roles.numeric.as_str())
                .group(year)
                .orientation(Orientation::Vertical)
                .plot_title(Text::from(title.as_str()))
                .x_title(roles.categorical.as_str())
                .y_title(roles.numeric.as_str())
                .legend_title(year)
                .build()
                .plot(),
            None => BoxPlot::builder()
                .data(self.frame())
                .labels(roles.categorical.as_str())
                .values(roles.numeric.as_str())
                .orientation(Orientation::Vertical)
                .plot_title(Text::from(title.as_str()))
                .x_title(roles.categorical.as_str())
                .y_title(roles.numeric.as_str())
                .build()
                .plot(),
        }
    }
}
