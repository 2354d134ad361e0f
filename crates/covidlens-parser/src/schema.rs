//! Column names of the source table. Every downstream stage addresses columns by these.

pub const LOCATION: &str = "location";
pub const ISO_CODE: &str = "iso_code";
pub const DATE: &str = "date";
pub const TOTAL_CASES: &str = "total_cases";
pub const TOTAL_DEATHS: &str = "total_deaths";
pub const NEW_CASES: &str = "new_cases";
pub const PEOPLE_VACCINATED: &str = "people_vaccinated";
pub const POPULATION: &str = "population";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColumn {
    Location,
    IsoCode,
    Date,
}

impl TextColumn {
    pub const ALL: [TextColumn; 3] = [TextColumn::Location, TextColumn::IsoCode, TextColumn::Date];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            TextColumn::Location => LOCATION,
            TextColumn::IsoCode => ISO_CODE,
            TextColumn::Date => DATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    TotalCases,
    TotalDeaths,
    NewCases,
    PeopleVaccinated,
    Population,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 5] = [
        NumericColumn::TotalCases,
        NumericColumn::TotalDeaths,
        NumericColumn::NewCases,
        NumericColumn::PeopleVaccinated,
        NumericColumn::Population,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            NumericColumn::TotalCases => TOTAL_CASES,
            NumericColumn::TotalDeaths => TOTAL_DEATHS,
            NumericColumn::NewCases => NEW_CASES,
            NumericColumn::PeopleVaccinated => PEOPLE_VACCINATED,
            NumericColumn::Population => POPULATION,
        }
    }
}

/// Output column order of a loaded table.
pub fn table_columns() -> Vec<&'static str> {
    TextColumn::ALL
        .iter()
        .map(TextColumn::canonical_name)
        .chain(NumericColumn::ALL.iter().map(NumericColumn::canonical_name))
        .collect()
}
