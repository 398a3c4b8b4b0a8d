//! Display strings for the two dashboard languages.
//!
//! Every user-facing string in the TUI and the text report comes from a
//! [`Labels`] table selected by [`Language`].

use dashboard_core::models::{WeekdayConvention, WeekendCodes};
use dashboard_data::aggregator::{HigherPartition, TrendDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Indonesian,
}

impl Language {
    /// Parse a `--lang` code. Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "id" => Language::Indonesian,
            _ => Language::English,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Language::English => &ENGLISH,
            Language::Indonesian => &INDONESIAN,
        }
    }
}

/// One language's worth of UI text.
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub footer: &'static str,

    // ── Dataset info ─────────────────────────────────────────────────────────
    pub dataset_info: &'static str,
    pub source: &'static str,
    pub total_records: &'static str,
    pub data_period: &'static str,
    pub total_rentals: &'static str,
    pub average_per_day: &'static str,
    pub median_rentals: &'static str,
    pub highest_rentals: &'static str,

    // ── Correlation ──────────────────────────────────────────────────────────
    pub correlation_title: &'static str,
    pub correlation_chart: &'static str,
    pub strongest_factor: &'static str,
    /// Title of the text block beside the correlation chart.
    pub insight: &'static str,
    pub with_correlation: &'static str,
    pub no_correlation: &'static str,
    pub interpretation: [&'static str; 3],

    // ── Weekday / weekend ────────────────────────────────────────────────────
    pub weekend_title: &'static str,
    pub weekday: &'static str,
    pub weekend: &'static str,
    pub difference: &'static str,
    pub weekend_days: &'static str,
    pub weekday_higher: &'static str,
    pub weekend_higher: &'static str,

    // ── Trend ────────────────────────────────────────────────────────────────
    pub trend_title: &'static str,
    pub trend_chart: &'static str,
    pub start_date: &'static str,
    pub end_date: &'static str,
    pub total_days: &'static str,
    pub average_day: &'static str,
    pub peak_day: &'static str,
    pub trend_prefix: &'static str,
    pub increased: &'static str,
    pub decreased: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub invalid_range: &'static str,
    pub no_data: &'static str,

    // ── Load state ───────────────────────────────────────────────────────────
    pub loading: &'static str,
    pub load_error: &'static str,
    pub retry_hint: &'static str,
    pub refresh_queued: &'static str,
    pub refresh_not_queued: &'static str,

    // ── Help ─────────────────────────────────────────────────────────────────
    pub glossary_title: &'static str,
    pub glossary: [(&'static str, &'static str); 8],
    pub key_hints: &'static str,

    /// Short day names, Sunday first.
    pub day_names: [&'static str; 7],
}

impl Labels {
    pub fn direction(&self, direction: TrendDirection) -> &'static str {
        match direction {
            TrendDirection::Increased => self.increased,
            TrendDirection::Decreased => self.decreased,
        }
    }

    pub fn higher_insight(&self, higher: HigherPartition) -> &'static str {
        match higher {
            HigherPartition::Weekday => self.weekday_higher,
            HigherPartition::Weekend => self.weekend_higher,
        }
    }

    /// Day names for `codes` under `convention`, e.g. `"Fri, Sat"`.
    pub fn weekend_day_names(&self, codes: &WeekendCodes, convention: WeekdayConvention) -> String {
        codes
            .iter()
            .filter_map(|code| convention.sunday_index(code))
            .map(|i| self.day_names[i])
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `"The bike rental trend has increased from 2011-01 to 2012-12"`.
    pub fn trend_sentence(&self, direction: TrendDirection, first: &str, last: &str) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.trend_prefix,
            self.direction(direction),
            self.from,
            first,
            self.to,
            last
        )
    }
}

static ENGLISH: Labels = Labels {
    title: "BIKE SHARING ANALYSIS",
    footer: "Bike Sharing Analysis Dashboard",

    dataset_info: "Dataset Info",
    source: "Source",
    total_records: "Total Records",
    data_period: "Data Period",
    total_rentals: "Total Rentals",
    average_per_day: "Average Rentals/Day",
    median_rentals: "Median Rentals",
    highest_rentals: "Highest Rentals",

    correlation_title: "1. Factors Influencing the Number of Bike Rentals",
    correlation_chart: "Feature Correlation with Total Bike Rentals",
    strongest_factor: "Strongest Factor:",
    insight: "Insight",
    with_correlation: "with a correlation of",
    no_correlation: "No feature has a defined correlation.",
    interpretation: [
        "Positive correlation (green) = increases rentals",
        "Negative correlation (red) = decreases rentals",
        "The longer the bar, the stronger the influence",
    ],

    weekend_title: "2. Average Bike Rentals: Weekdays vs Weekends",
    weekday: "Weekday",
    weekend: "Weekend",
    difference: "Difference",
    weekend_days: "Weekend days",
    weekday_higher: "Rentals are higher on weekdays, likely used for commuting to work/school.",
    weekend_higher: "Rentals are higher on weekends, likely used for leisure activities.",

    trend_title: "3. Trend of Bike Rentals Over Time",
    trend_chart: "Trend of Total Bike Rentals per Month",
    start_date: "Start Date",
    end_date: "End Date",
    total_days: "Total Days",
    average_day: "Average/Day",
    peak_day: "Peak Day",
    trend_prefix: "The bike rental trend has",
    increased: "increased",
    decreased: "decreased",
    from: "from",
    to: "to",
    invalid_range: "Start date cannot be later than end date!",
    no_data: "No data available for the selected date range.",

    loading: "Loading dataset...",
    load_error: "Error loading data",
    retry_hint: "Press 'r' to retry",
    refresh_queued: "Refreshing dataset...",
    refresh_not_queued: "Refresh not queued: loader busy or stopped",

    glossary_title: "Feature Explanation",
    glossary: [
        ("registered", "Registered users"),
        ("casual", "Casual users"),
        ("temp", "Normalized temperature"),
        ("hum", "Normalized humidity"),
        ("windspeed", "Normalized wind speed"),
        ("cnt", "Total bike rentals"),
        ("weathersit", "Weather situation"),
        ("season", "Season"),
    ],
    key_hints: "Tab date | ←/→ day | ↑/↓ month | Home/End bounds | r refresh | ? features | q quit",

    day_names: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
};

static INDONESIAN: Labels = Labels {
    title: "ANALISIS DATA BIKE SHARING",
    footer: "Dashboard Analisis Bike Sharing",

    dataset_info: "Info Dataset",
    source: "Sumber",
    total_records: "Total Records",
    data_period: "Periode Data",
    total_rentals: "Total Penyewaan",
    average_per_day: "Rata-rata Penyewaan/Hari",
    median_rentals: "Median Penyewaan",
    highest_rentals: "Penyewaan Tertinggi",

    correlation_title: "1. Faktor-faktor yang Mempengaruhi Jumlah Penyewaan Sepeda",
    correlation_chart: "Korelasi Fitur dengan Jumlah Penyewaan Sepeda",
    strongest_factor: "Faktor terkuat:",
    insight: "Wawasan",
    with_correlation: "dengan korelasi",
    no_correlation: "Tidak ada fitur dengan korelasi terdefinisi.",
    interpretation: [
        "Korelasi positif (hijau) = meningkatkan penyewaan",
        "Korelasi negatif (merah) = menurunkan penyewaan",
        "Semakin panjang bar, semakin kuat pengaruhnya",
    ],

    weekend_title: "2. Rata-rata Penyewaan Sepeda: Hari Kerja vs Akhir Pekan",
    weekday: "Hari Kerja",
    weekend: "Akhir Pekan",
    difference: "Selisih",
    weekend_days: "Hari akhir pekan",
    weekday_higher:
        "Penyewaan lebih tinggi pada hari kerja, kemungkinan digunakan untuk transportasi ke kantor/sekolah.",
    weekend_higher: "Penyewaan lebih tinggi pada akhir pekan, kemungkinan untuk healing.",

    trend_title: "3. Trend Penyewaan Sepeda dari Waktu ke Waktu",
    trend_chart: "Trend Jumlah Penyewaan Sepeda per Bulan",
    start_date: "Tanggal mulai",
    end_date: "Tanggal akhir",
    total_days: "Total Hari",
    average_day: "Rata-rata/Hari",
    peak_day: "Peak Day",
    trend_prefix: "Trend penyewaan sepeda",
    increased: "meningkat",
    decreased: "menurun",
    from: "dari",
    to: "ke",
    invalid_range: "Tanggal mulai tidak boleh lebih besar dari tanggal akhir!",
    no_data: "Tidak ada data untuk rentang tanggal yang dipilih.",

    loading: "Memuat dataset...",
    load_error: "Gagal memuat data",
    retry_hint: "Tekan 'r' untuk mencoba lagi",
    refresh_queued: "Memuat ulang dataset...",
    refresh_not_queued: "Muat ulang tidak diantrekan: pemuat sibuk atau berhenti",

    glossary_title: "Penjelasan Fitur",
    glossary: [
        ("registered", "Penyewa terdaftar"),
        ("casual", "Penyewa biasa"),
        ("temp", "Suhu"),
        ("hum", "Kelembaban"),
        ("windspeed", "Kecepatan angin"),
        ("cnt", "Total penyewaan sepeda"),
        ("weathersit", "Situasi cuaca"),
        ("season", "Musim"),
    ],
    key_hints: "Tab tanggal | ←/→ hari | ↑/↓ bulan | Home/End batas | r muat ulang | ? fitur | q keluar",

    day_names: ["Min", "Sen", "Sel", "Rab", "Kam", "Jum", "Sab"],
};

// ── Tests ─────────────────────────────────────────────────────────────────────
