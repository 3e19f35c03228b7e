// src/services/dashboard_service.rs
//
// Agregação do dashboard: funções puras sobre o snapshot de leads + as listas
// de configuração. Reexecutar com as mesmas entradas devolve exatamente o
// mesmo resultado, na mesma ordem (a ordem declarada nas listas, nunca a
// ordem de iteração de um mapa).

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    dashboard::{ChartEntry, DashboardResumo, FiltroDashboard, PeriodoFiltro},
    lead::Lead,
    settings::{AppSettings, FUNIL_CONVERSAO, STATUS_ENCERRADOS, STATUS_GANHO},
};

/// Aplica os filtros de período (contra a data de entrada, no calendário
/// local) e de responsável. Responsável fora da lista de configurações é
/// ignorado, não filtra nada.
pub fn aplicar_filtro<'a>(
    leads: &'a [Lead],
    settings: &AppSettings,
    filtro: &FiltroDashboard,
    hoje: NaiveDate,
) -> Vec<&'a Lead> {
    let responsavel = filtro
        .responsavel
        .as_deref()
        .filter(|r| settings.responsaveis.iter().any(|x| x == r));

    leads
        .iter()
        .filter(|l| match filtro.periodo {
            PeriodoFiltro::Todos => true,
            PeriodoFiltro::EsteMes => {
                l.data_entrada.year() == hoje.year() && l.data_entrada.month() == hoje.month()
            }
            PeriodoFiltro::EsteAno => l.data_entrada.year() == hoje.year(),
        })
        .filter(|l| responsavel.is_none_or(|r| l.responsavel == r))
        .collect()
}

/// KPIs e agrupamentos do dashboard, derivados em uma única passada sobre a
/// lista filtrada. Nunca falha: campo ausente/estranho vale neutro.
pub fn resumo(
    leads: &[Lead],
    settings: &AppSettings,
    filtro: &FiltroDashboard,
    hoje: NaiveDate,
) -> DashboardResumo {
    let filtrados = aplicar_filtro(leads, settings, filtro, hoje);

    let mut por_status: HashMap<&str, i64> = HashMap::new();
    let mut por_origem: HashMap<&str, i64> = HashMap::new();
    let mut por_produto: HashMap<&str, i64> = HashMap::new();
    let mut ativos = 0i64;
    let mut ganhos = 0i64;
    let mut funil = 0i64;
    let mut total_vendido = Decimal::ZERO;

    for lead in &filtrados {
        *por_status.entry(lead.status_lead.as_str()).or_insert(0) += 1;
        *por_origem.entry(lead.origem_lead.as_str()).or_insert(0) += 1;
        *por_produto.entry(lead.produto_interesse.as_str()).or_insert(0) += 1;

        let status = lead.status_lead.as_str();
        if !STATUS_ENCERRADOS.contains(&status) {
            ativos += 1;
        }
        if FUNIL_CONVERSAO.contains(&status) {
            funil += 1;
        }
        if status == STATUS_GANHO {
            ganhos += 1;
            if let Some(valor) = lead.valor_venda {
                total_vendido += valor;
            }
        }
    }

    let taxa_conversao = if funil == 0 {
        0.0
    } else {
        ganhos as f64 / funil as f64 * 100.0
    };

    DashboardResumo {
        total_leads: filtrados.len() as i64,
        leads_ativos: ativos,
        taxa_conversao,
        valor_total_vendido: total_vendido,
        leads_por_status: projetar(&por_status, &settings.status_lead),
        leads_por_origem: projetar(&por_origem, &settings.origem_lead),
        leads_por_produto: projetar(&por_produto, &settings.produto_interesse),
    }
}

// Projeta as contagens na ordem declarada da lista canônica; contagem zero
// (ou rótulo órfão, fora da lista) não vira fatia de gráfico.
fn projetar(contagens: &HashMap<&str, i64>, ordem: &[String]) -> Vec<ChartEntry> {
    ordem
        .iter()
        .filter_map(|rotulo| {
            let value = contagens.get(rotulo.as_str()).copied().unwrap_or(0);
            (value > 0).then(|| ChartEntry {
                name: rotulo.clone(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn hoje() -> NaiveDate {
        data(2024, 3, 15)
    }

    fn lead(status: &str, origem: &str, entrada: NaiveDate) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            nome: "Lead".into(),
            telefone: "".into(),
            email: "".into(),
            cidade: "".into(),
            origem_lead: origem.into(),
            produto_interesse: "Produto A".into(),
            status_lead: status.into(),
            temperatura: "Quente".into(),
            responsavel: "Eu".into(),
            data_entrada: entrada,
            proximo_contato: None,
            observacoes: "".into(),
            valor_venda: None,
            data_venda: None,
            motivo_perda: None,
            created_at: Utc::now(),
        }
    }

    fn filtro(periodo: PeriodoFiltro, responsavel: Option<&str>) -> FiltroDashboard {
        FiltroDashboard {
            periodo,
            responsavel: responsavel.map(|r| r.to_string()),
        }
    }

    #[test]
    fn total_leads_e_sempre_o_tamanho_da_lista_filtrada() {
        let settings = AppSettings::default();
        let leads = vec![
            lead("Novo", "Indicação", data(2024, 3, 1)),
            lead("Novo", "WhatsApp", data(2024, 1, 10)),
            lead("Contatado", "Indicação", data(2023, 7, 1)),
        ];

        for (periodo, responsavel) in [
            (PeriodoFiltro::Todos, None),
            (PeriodoFiltro::EsteMes, None),
            (PeriodoFiltro::EsteAno, None),
            (PeriodoFiltro::Todos, Some("Eu")),
            (PeriodoFiltro::EsteAno, Some("Ninguém")),
        ] {
            let f = filtro(periodo, responsavel);
            let filtrados = aplicar_filtro(&leads, &settings, &f, hoje());
            let r = resumo(&leads, &settings, &f, hoje());
            assert_eq!(r.total_leads, filtrados.len() as i64);
        }
    }

    #[test]
    fn periodo_este_mes_e_este_ano_olham_a_data_de_entrada() {
        let settings = AppSettings::default();
        let leads = vec![
            lead("Novo", "Indicação", data(2024, 3, 1)),
            lead("Novo", "Indicação", data(2024, 3, 31)),
            lead("Novo", "Indicação", data(2024, 1, 10)),
            lead("Novo", "Indicação", data(2023, 3, 15)), // março de OUTRO ano
        ];

        let mes = resumo(&leads, &settings, &filtro(PeriodoFiltro::EsteMes, None), hoje());
        assert_eq!(mes.total_leads, 2);

        let ano = resumo(&leads, &settings, &filtro(PeriodoFiltro::EsteAno, None), hoje());
        assert_eq!(ano.total_leads, 3);
    }

    #[test]
    fn responsavel_fora_da_lista_de_configuracoes_e_ignorado() {
        let settings = AppSettings::default(); // responsaveis = ["Eu"]
        let mut de_outro = lead("Novo", "Indicação", data(2024, 3, 1));
        de_outro.responsavel = "Carlos".into();
        let leads = vec![lead("Novo", "Indicação", data(2024, 3, 2)), de_outro];

        // "Carlos" não está na lista: o filtro não se aplica
        let r = resumo(&leads, &settings, &filtro(PeriodoFiltro::Todos, Some("Carlos")), hoje());
        assert_eq!(r.total_leads, 2);

        // "Eu" está na lista: filtra de verdade
        let r = resumo(&leads, &settings, &filtro(PeriodoFiltro::Todos, Some("Eu")), hoje());
        assert_eq!(r.total_leads, 1);
    }

    #[test]
    fn ativos_excluem_ganho_perdido_e_nutricao() {
        let settings = AppSettings::default();
        let leads = vec![
            lead("Novo", "Indicação", data(2024, 3, 1)),
            lead("Qualificado", "Indicação", data(2024, 3, 2)),
            lead("Ganho (Vendido)", "Indicação", data(2024, 3, 3)),
            lead("Perdido", "Indicação", data(2024, 3, 4)),
            lead("Nutrição", "Indicação", data(2024, 3, 5)),
        ];
        let r = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());
        assert_eq!(r.total_leads, 5);
        assert_eq!(r.leads_ativos, 2);
    }

    #[test]
    fn taxa_de_conversao_usa_o_funil_como_denominador() {
        let settings = AppSettings::default();
        let leads = vec![
            lead("Ganho (Vendido)", "Indicação", data(2024, 3, 1)),
            lead("Qualificado", "Indicação", data(2024, 3, 2)),
            lead("Proposta Enviada", "Indicação", data(2024, 3, 3)),
            lead("Negociação", "Indicação", data(2024, 3, 4)),
            lead("Novo", "Indicação", data(2024, 3, 5)), // fora do funil
        ];
        let r = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());
        assert_eq!(r.taxa_conversao, 25.0); // 1 ganho ÷ 4 de funil
    }

    #[test]
    fn lista_vazia_nao_produz_nan_nem_infinito() {
        let settings = AppSettings::default();
        let r = resumo(&[], &settings, &FiltroDashboard::default(), hoje());

        assert_eq!(r.total_leads, 0);
        assert_eq!(r.taxa_conversao, 0.0);
        assert!(r.taxa_conversao.is_finite());
        assert_eq!(r.valor_total_vendido, Decimal::ZERO);
        assert!(r.leads_por_status.is_empty());
    }

    #[test]
    fn valor_vendido_soma_apenas_ganhos_com_valor_presente() {
        let settings = AppSettings::default();
        let mut com_valor = lead("Ganho (Vendido)", "Indicação", data(2024, 3, 1));
        com_valor.valor_venda = Some(Decimal::new(150050, 2)); // 1500.50
        let sem_valor = lead("Ganho (Vendido)", "Indicação", data(2024, 3, 2));
        let mut perdido_com_valor = lead("Perdido", "Indicação", data(2024, 3, 3));
        perdido_com_valor.valor_venda = Some(Decimal::new(999, 0));

        let leads = vec![com_valor, sem_valor, perdido_com_valor];
        let r = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());
        assert_eq!(r.valor_total_vendido, Decimal::new(150050, 2));
    }

    #[test]
    fn agrupamentos_seguem_a_ordem_declarada_e_omitem_zeros() {
        let settings = AppSettings::default();
        let leads = vec![
            lead("Negociação", "WhatsApp", data(2024, 3, 1)),
            lead("Novo", "Facebook Ads", data(2024, 3, 2)),
            lead("Novo", "WhatsApp", data(2024, 3, 3)),
        ];
        let r = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());

        // Ordem da lista padrão de status: "Novo" vem antes de "Negociação"
        let nomes: Vec<&str> = r.leads_por_status.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(nomes, vec!["Novo", "Negociação"]);

        let origens: Vec<&str> = r.leads_por_origem.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(origens, vec!["Facebook Ads", "WhatsApp"]);

        assert!(r.leads_por_status.iter().all(|e| e.value > 0));
    }

    #[test]
    fn rotulo_orfao_conta_no_total_mas_nao_vira_fatia() {
        let settings = AppSettings::default();
        let leads = vec![
            lead("Status Antigo", "Origem Removida", data(2024, 3, 1)),
            lead("Novo", "Indicação", data(2024, 3, 2)),
        ];
        let r = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());

        assert_eq!(r.total_leads, 2);
        let soma_status: i64 = r.leads_por_status.iter().map(|e| e.value).sum();
        assert!(soma_status <= r.total_leads);
        assert_eq!(soma_status, 1); // só o "Novo" tem rótulo canônico
    }

    #[test]
    fn reexecucao_com_as_mesmas_entradas_e_deterministica() {
        let settings = AppSettings::default();
        let leads: Vec<Lead> = (0..20u32)
            .map(|i| {
                lead(
                    if i % 2 == 0 { "Novo" } else { "Contatado" },
                    if i % 3 == 0 { "WhatsApp" } else { "Indicação" },
                    data(2024, 3, (i % 28) + 1),
                )
            })
            .collect();

        let f = FiltroDashboard::default();
        assert_eq!(
            resumo(&leads, &settings, &f, hoje()),
            resumo(&leads, &settings, &f, hoje())
        );
    }

    #[test]
    fn exclusao_de_lead_some_dos_agrupamentos_na_proxima_computacao() {
        let settings = AppSettings::default();
        let mut leads = vec![
            lead("Novo", "WhatsApp", data(2024, 3, 1)),
            lead("Contatado", "Indicação", data(2024, 3, 2)),
        ];

        let antes = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());
        assert_eq!(antes.leads_por_status.len(), 2);

        // O snapshot seguinte chega sem o lead; nada é "ressubscrito"
        leads.remove(0);
        let depois = resumo(&leads, &settings, &FiltroDashboard::default(), hoje());

        assert_eq!(depois.total_leads, 1);
        assert!(depois.leads_por_status.iter().all(|e| e.name != "Novo"));
        assert!(depois.leads_por_origem.iter().all(|e| e.name != "WhatsApp"));
    }
}
