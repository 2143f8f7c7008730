use chrono::NaiveDate;

use crate::data::series::AlignedSeries;

/// Line colors, assigned by row position, wrapping past the end.
pub const PALETTE: [(u8, u8, u8); 5] = [
    (54, 162, 235),  // blue
    (255, 99, 132),  // red
    (255, 159, 64),  // orange
    (75, 192, 192),  // teal
    (153, 102, 255), // purple
];

pub const LINE_WIDTH: f32 = 1.2;

/// One renderable line. `segments` holds contiguous runs of `[x, y]` points,
/// x counted in days from the chart start date; a gap in the source row ends
/// the current segment so the renderer never draws across it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartDataset {
    pub label: String,
    pub color: (u8, u8, u8),
    pub segments: Vec<Vec<[f64; 2]>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSpec {
    pub start_date: Option<NaiveDate>,
    pub dates: Vec<NaiveDate>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

pub fn build_chart(aligned: &AlignedSeries) -> ChartSpec {
    let Some(start_date) = aligned.start_date() else {
        return ChartSpec::default();
    };

    let datasets = aligned
        .rows()
        .iter()
        .enumerate()
        .map(|(row, (symbol, values))| {
            let mut segments: Vec<Vec<[f64; 2]>> = vec![];
            let mut segment: Vec<[f64; 2]> = vec![];

            for (date, value) in aligned.dates().iter().zip(values) {
                if let Some(value) = value {
                    let x = (*date - start_date).num_days() as f64;
                    segment.push([x, *value]);
                } else if !segment.is_empty() {
                    segments.push(std::mem::take(&mut segment));
                }
            }
            if !segment.is_empty() {
                segments.push(segment);
            }

            ChartDataset {
                label: symbol.to_string(),
                color: PALETTE[row % PALETTE.len()],
                segments,
            }
        })
        .collect();

    ChartSpec {
        start_date: Some(start_date),
        dates: aligned.dates().to_vec(),
        datasets,
    }
}
