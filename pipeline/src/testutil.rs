use std::path::Path;

use mockall::mock;

use crate::{
    config::{Provider, load_providers},
    locator::{TableLocator, TableRegion},
    table::Table,
};

mock! {
    pub Locator {}

    impl TableLocator for Locator {
        fn locate_table(
            &self,
            pdf_path: &Path,
            region: &TableRegion,
        ) -> anyhow::Result<Option<Table>>;
    }
}

/// The Coelce provider, as configured in the configuration shipped with the workspace.
pub fn coelce_provider() -> Provider {
    let providers = load_providers(include_str!("../../config/providers.yaml").as_bytes())
        .expect("shipped configuration should load");
    providers
        .get("coelce")
        .expect("coelce should be configured")
        .clone()
}

/// Grid as located on the first page of a Coelce invoice, including the leftovers of the
/// invoice's two line header and the tax rows that follow the subtotal.
pub fn coelce_grid() -> Table {
    Table::from([
        vec![""; 10],
        vec![
            "Itens de Fatura",
            "Unid",
            "Quant",
            "Preço unit",
            "Valor",
            "PIS/",
            "Base Calc",
            "Alíquota",
            "ICMS",
            "Tarifa",
        ],
        vec!["", "", "", "com tributos", "(R$)", "COFINS", "ICMS (R$)", "ICMS", "", "unit (R$)"],
        vec![
            "Energia Ativa Fornecida TE",
            "kWh",
            "300",
            "0,45",
            "1.000,00",
            "12,34",
            "1.000,00",
            "20%",
            "200,00",
            "0,33",
        ],
        vec![
            "Energia Ativa Fornecida TUSD",
            "kWh",
            "300",
            "0,30",
            "500,00",
            "6,17",
            "500,00",
            "20%",
            "100,00",
            "0,22",
        ],
        vec!["", "", "", "", "", "", "", "", "", ""],
        vec!["CIP ILUM PUB PREF MUNICIPAL", "", "", "", "150,00", "", "", "", "", ""],
        vec!["Juros Moratória", "", "", "", "1,05-", "", "", "", "", ""],
        vec!["Subtotal Faturamento", "", "", "", "1.648,95", "", "", "", "", ""],
        vec!["PIS", "", "", "", "18,51", "", "", "", "", ""],
    ])
}
