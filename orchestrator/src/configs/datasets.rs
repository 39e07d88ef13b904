//! Column catalog of the sample datasets.

use comms::specs::DatasetSelection;

const TITANIC_COLUMNS: &[&str] = &[
    "PassengerId", "Survived", "Pclass", "Name", "Sex", "Age", "SibSp", "Parch", "Ticket", "Fare",
    "Cabin", "Embarked",
];

const LEGO_COLUMNS: &[&str] = &[
    "SetId", "Name", "Year", "Theme", "ThemeGroup", "Subtheme", "Category", "Packaging",
    "NumInstructions", "Availability", "Pieces", "Minifigures", "Owned", "Rating", "UsdMsrp",
    "TotalQuantity", "CurrentPrice",
];

const HOUSE_COLUMNS: &[&str] = &[
    "HouseId", "MSSubClass", "MSZoning", "LotFrontage", "LotArea", "Street", "Alley", "LotShape",
    "LandContour", "Utilities", "LotConfig", "LandSlope", "Neighborhood", "Condition1",
    "Condition2", "BldgType", "HouseStyle", "OverallQual", "OverallCond", "YearBuilt",
    "YearRemodAdd", "RoofStyle", "RoofMatl", "Exterior1st", "Exterior2nd", "MasVnrType",
    "MasVnrArea", "ExterQual", "ExterCond", "Foundation", "BsmtQual", "BsmtCond", "BsmtExposure",
    "BsmtFinType1", "BsmtFinSF1", "BsmtFinType2", "BsmtFinSF2", "BsmtUnfSF", "TotalBsmtSF",
    "Heating", "HeatingQC", "CentralAir", "Electrical", "1stFlrSF", "2ndFlrSF", "LowQualFinSF",
    "GrLivArea", "BsmtFullBath", "BsmtHalfBath", "FullBath", "HalfBath", "BedroomAbvGr",
    "KitchenAbvGr", "KitchenQual", "TotRmsAbvGrd", "Functional", "Fireplaces", "FireplaceQu",
    "GarageType", "GarageYrBlt", "GarageFinish", "GarageCars", "GarageArea", "GarageQual",
    "GarageCond", "PavedDrive", "WoodDeckSF", "OpenPorchSF", "EnclosedPorch", "3SsnPorch",
    "ScreenPorch", "PoolArea", "PoolQC", "Fence", "MiscFeature", "MiscVal", "MoSold", "YrSold",
    "SaleType", "SaleCondition", "SalePrice",
];

/// Columns of the dataset, in import order.
pub fn columns(dataset: DatasetSelection) -> &'static [&'static str] {
    match dataset {
        DatasetSelection::Titanic => TITANIC_COLUMNS,
        DatasetSelection::Lego => LEGO_COLUMNS,
        DatasetSelection::House => HOUSE_COLUMNS,
    }
}

/// Identifier-like columns that cannot be predicted.
pub fn excluded_targets(dataset: DatasetSelection) -> &'static [&'static str] {
    match dataset {
        DatasetSelection::Titanic => &["PassengerId", "Name", "Ticket", "Cabin"],
        DatasetSelection::Lego => &["SetId", "Name", "Theme", "Subtheme"],
        DatasetSelection::House => &["HouseId"],
    }
}

/// The target proposed right after an import.
pub fn default_target(dataset: DatasetSelection) -> &'static str {
    match dataset {
        DatasetSelection::Titanic => "Survived",
        DatasetSelection::Lego => "CurrentPrice",
        DatasetSelection::House => "SalePrice",
    }
}

pub fn target_candidates(dataset: DatasetSelection) -> impl Iterator<Item = &'static str> {
    let excluded = excluded_targets(dataset);
    columns(dataset)
        .iter()
        .copied()
        .filter(move |c| !excluded.contains(c))
}

pub fn is_target_candidate(dataset: DatasetSelection, column: &str) -> bool {
    target_candidates(dataset).any(|c| c == column)
}
