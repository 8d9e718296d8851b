use crate::config::LayoutMode;
use crate::data::ColumnDef;
use crate::ir::{ChartKind, ChartSpec};
use crate::layout::Region;
use crate::palette::PaletteId;
use crate::transform::Transform;

/// One fixed dashboard panel: where its data lives, how it is prepared,
/// how it is drawn and what is written next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDefinition {
    pub number: usize,
    /// Data file name without the `.csv` extension
    pub file_stem: &'static str,
    pub schema: &'static [ColumnDef],
    pub transform: Transform,
    pub heading: &'static str,
    /// Heading used by the stacked page, prefixed with the panel number
    pub stacked_heading: &'static str,
    /// Title drawn inside the chart on the stacked page
    pub chart_title: &'static str,
    pub caption: &'static str,
    /// Columns row and column index
    pub slot: (usize, usize),
    build: fn(LayoutMode) -> ChartSpec,
}

impl PanelDefinition {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem)
    }

    pub fn heading(&self, mode: LayoutMode) -> String {
        match mode {
            LayoutMode::Columns => self.heading.to_string(),
            LayoutMode::Stacked => format!("{}. {}", self.number, self.stacked_heading),
        }
    }

    pub fn chart(&self, mode: LayoutMode) -> ChartSpec {
        let spec = (self.build)(mode);
        match mode {
            LayoutMode::Columns => spec,
            LayoutMode::Stacked => spec.title(self.chart_title),
        }
    }

    pub fn region(&self, mode: LayoutMode) -> Region {
        match mode {
            LayoutMode::Columns => Region::Column {
                row: self.slot.0,
                column: self.slot.1,
            },
            LayoutMode::Stacked => Region::FullWidth { row: self.number - 1 },
        }
    }
}

const STREAMS_PER_PLATFORM: &[ColumnDef] =
    &[ColumnDef::text("platform_name"), ColumnDef::numeric("total_streams")];
const REVENUE_PER_PLATFORM: &[ColumnDef] =
    &[ColumnDef::text("platform_name"), ColumnDef::numeric("total_revenue")];
const LISTENERS_PER_COUNTRY: &[ColumnDef] =
    &[ColumnDef::text("country"), ColumnDef::numeric("listener_count")];
const GENRE_LISTENERS: &[ColumnDef] =
    &[ColumnDef::text("preferred_genre"), ColumnDef::numeric("listener_count")];
const ARTIST_REVENUE: &[ColumnDef] =
    &[ColumnDef::text("artist_name"), ColumnDef::numeric("total_revenue")];
const SONGS_PER_YEAR: &[ColumnDef] =
    &[ColumnDef::numeric("year"), ColumnDef::numeric("songs_released")];
const GENRE_POPULARITY: &[ColumnDef] =
    &[ColumnDef::text("genre"), ColumnDef::numeric("avg_popularity")];
const SONG_STREAMS: &[ColumnDef] =
    &[ColumnDef::text("title"), ColumnDef::numeric("total_streams")];
const REVENUE_PER_STREAM: &[ColumnDef] =
    &[ColumnDef::text("platform_name"), ColumnDef::numeric("avg_revenue_per_stream")];
const ARTIST_STREAMS: &[ColumnDef] =
    &[ColumnDef::text("artist_name"), ColumnDef::numeric("total_streams")];

/// The ten panels in page order
pub fn panels() -> Vec<PanelDefinition> {
    vec![
        PanelDefinition {
            number: 1,
            file_stem: "total_streams_per_platform",
            schema: STREAMS_PER_PLATFORM,
            transform: Transform::top("total_streams", 10),
            heading: "Total Streams per Platform (Top 10)",
            stacked_heading: "Total Streams per Platform",
            chart_title: "Streams Distribution by Platform",
            caption: "The chart shows that certain platforms dominate total stream counts, offering better audience reach opportunities for artists.",
            slot: (0, 0),
            build: |mode| match mode {
                LayoutMode::Columns => ChartSpec::new(ChartKind::Bar, PaletteId::Pastel)
                    .y("platform_name")
                    .x("total_streams")
                    .color("platform_name")
                    .horizontal(),
                LayoutMode::Stacked => ChartSpec::new(ChartKind::Bar, PaletteId::Pastel)
                    .x("platform_name")
                    .y("total_streams")
                    .color("platform_name"),
            },
        },
        PanelDefinition {
            number: 2,
            file_stem: "revenue_per_platform",
            schema: REVENUE_PER_PLATFORM,
            transform: Transform::top("total_revenue", 10),
            heading: "Revenue Share per Platform (Top 10)",
            stacked_heading: "Revenue Share per Platform",
            chart_title: "Revenue Distribution Across Platforms",
            caption: "Revenue distribution varies slightly among top platforms, indicating some platforms are financially more rewarding per stream.",
            slot: (0, 1),
            build: |mode| match mode {
                LayoutMode::Columns => ChartSpec::new(ChartKind::Sunburst, PaletteId::Set2)
                    .path(&["platform_name"])
                    .values("total_revenue"),
                LayoutMode::Stacked => ChartSpec::new(ChartKind::Pie, PaletteId::Set2)
                    .names("platform_name")
                    .values("total_revenue"),
            },
        },
        PanelDefinition {
            number: 3,
            file_stem: "listeners_per_country",
            schema: LISTENERS_PER_COUNTRY,
            transform: Transform::Identity,
            heading: "Number of Listeners by Country",
            stacked_heading: "Number of Listeners by Country",
            chart_title: "Listeners Count by Country",
            caption: "Listener distribution highlights countries where music streaming is most popular, helping plan regional marketing strategies.",
            slot: (1, 0),
            build: |mode| {
                let bars = ChartSpec::new(ChartKind::Bar, PaletteId::Bold)
                    .y("country")
                    .x("listener_count")
                    .horizontal();
                match mode {
                    LayoutMode::Columns => bars.color("country"),
                    // One colour for every bar
                    LayoutMode::Stacked => bars,
                }
            },
        },
        PanelDefinition {
            number: 4,
            file_stem: "top_genres_listeners",
            schema: GENRE_LISTENERS,
            transform: Transform::Identity,
            heading: "Top 10 Genres Preferred by Listeners",
            stacked_heading: "Top 10 Genres Preferred by Listeners",
            chart_title: "Top Genres",
            caption: "The top genres reflect audience music preferences, which artists and platforms can use for content curation.",
            slot: (1, 1),
            build: |_| {
                ChartSpec::new(ChartKind::Donut, PaletteId::BluesR)
                    .names("preferred_genre")
                    .values("listener_count")
                    .hole(0.5)
            },
        },
        PanelDefinition {
            number: 5,
            file_stem: "top_artists_revenue",
            schema: ARTIST_REVENUE,
            transform: Transform::Identity,
            heading: "Top 10 Artists by Total Revenue",
            stacked_heading: "Top 10 Artists by Total Revenue",
            chart_title: "Top Artists by Revenue",
            caption: "A few top artists generate significant revenue, showcasing the importance of hit songs and loyal listener bases.",
            slot: (1, 2),
            build: |_| {
                ChartSpec::new(ChartKind::Bar, PaletteId::Dark2)
                    .x("artist_name")
                    .y("total_revenue")
                    .color("artist_name")
            },
        },
        PanelDefinition {
            number: 6,
            file_stem: "songs_released_per_year",
            schema: SONGS_PER_YEAR,
            transform: Transform::Identity,
            heading: "Songs Released Per Year",
            stacked_heading: "Songs Released Per Year",
            chart_title: "Songs Released Trend Over Years",
            caption: "Song releases show a consistent trend with occasional peaks, highlighting active periods in the music industry.",
            slot: (2, 0),
            build: |_| {
                ChartSpec::new(ChartKind::Line, PaletteId::Set3)
                    .x("year")
                    .y("songs_released")
                    .markers()
            },
        },
        PanelDefinition {
            number: 7,
            file_stem: "avg_popularity_per_genre",
            schema: GENRE_POPULARITY,
            transform: Transform::top("avg_popularity", 10),
            heading: "Average Popularity Score per Genre (Top 10)",
            stacked_heading: "Average Popularity Score per Genre",
            chart_title: "Average Popularity by Genre",
            caption: "Some genres consistently maintain higher average popularity, reflecting stable listener loyalty.",
            slot: (2, 1),
            build: |mode| {
                let points = ChartSpec::new(ChartKind::Scatter, PaletteId::PlasmaR);
                let points = match mode {
                    LayoutMode::Columns => points.x("avg_popularity").y("genre"),
                    LayoutMode::Stacked => points.x("genre").y("avg_popularity"),
                };
                points.size("avg_popularity").color("genre")
            },
        },
        PanelDefinition {
            number: 8,
            file_stem: "top_songs_by_streams",
            schema: SONG_STREAMS,
            transform: Transform::Identity,
            heading: "Top 10 Songs by Total Streams",
            stacked_heading: "Top 10 Songs by Total Streams",
            chart_title: "Top Songs by Streams",
            caption: "Certain songs outperform others massively in total streams, reflecting viral trends or artist fanbase strength.",
            slot: (3, 0),
            build: |_| {
                ChartSpec::new(ChartKind::PolarLine, PaletteId::Magenta)
                    .r("total_streams")
                    .theta("title")
                    .closed()
            },
        },
        PanelDefinition {
            number: 9,
            file_stem: "avg_revenue_per_stream_by_platform",
            schema: REVENUE_PER_STREAM,
            transform: Transform::top("avg_revenue_per_stream", 10),
            heading: "Average Revenue Per Stream by Platform (Top 10)",
            stacked_heading: "Average Revenue Per Stream by Platform",
            chart_title: "Avg Revenue Per Stream (Higher is Better)",
            caption: "Some platforms offer higher average payouts per stream, making them more attractive for monetization.",
            slot: (3, 1),
            build: |_| {
                ChartSpec::new(ChartKind::Bar, PaletteId::Prism)
                    .x("platform_name")
                    .y("avg_revenue_per_stream")
                    .color("platform_name")
            },
        },
        PanelDefinition {
            number: 10,
            file_stem: "top_artists_by_streams",
            schema: ARTIST_STREAMS,
            transform: Transform::top("total_streams", 10),
            heading: "Top Artists by Total Streams (Top 10)",
            stacked_heading: "Top Artists by Total Streams",
            chart_title: "Top Artists based on Streams",
            caption: "Stream counts reveal the most in-demand artists, reflecting both popularity and marketing success.",
            slot: (3, 2),
            build: |mode| match mode {
                LayoutMode::Columns => ChartSpec::new(ChartKind::Bar, PaletteId::YlOrRd)
                    .y("artist_name")
                    .x("total_streams")
                    .color("artist_name")
                    .horizontal(),
                LayoutMode::Stacked => ChartSpec::new(ChartKind::Treemap, PaletteId::YlOrRd)
                    .path(&["artist_name"])
                    .values("total_streams"),
            },
        },
    ]
}
