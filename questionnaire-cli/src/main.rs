use colored::*;
use serde_json::{json, Map, Value};
use std::io::{self, Write};

const USAGES: [(&str, &str); 6] = [
    ("familia", "Família"),
    ("trabalho", "Trabalho / deslocamento diário"),
    ("lazer", "Lazer e viagens"),
    ("comercial", "Uso comercial"),
    ("transporte_app", "Transporte por aplicativo"),
    ("primeiro_carro", "Primeiro carro"),
];

const PRIORITIES: [(&str, &str); 5] = [
    ("economia", "Economia"),
    ("espaco", "Espaço"),
    ("performance", "Desempenho"),
    ("conforto", "Conforto"),
    ("seguranca", "Segurança"),
];

const TRANSMISSIONS: [(&str, &str); 4] = [
    ("manual", "Manual"),
    ("automatico", "Automático"),
    ("automatizado", "Automatizado"),
    ("cvt", "CVT"),
];

const INCOMES: [(&str, &str); 5] = [
    ("ate_3000", "Até R$ 3.000"),
    ("3000_5000", "R$ 3.000 a R$ 5.000"),
    ("5000_8000", "R$ 5.000 a R$ 8.000"),
    ("8000_12000", "R$ 8.000 a R$ 12.000"),
    ("acima_12000", "Acima de R$ 12.000"),
];

const MAX_PRIORITIES: usize = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("CAR_MATCHER_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!("{}", "🚗 Car Matcher - Questionário".bright_blue().bold());
    println!("{}", "=============================".bright_blue());
    println!("Servidor: {}", base_url);

    let client = reqwest::Client::new();

    loop {
        let profile = ask_profile()?;
        let regional = ask_yes_no("Mostrar apenas carros do seu estado? (s/n): ")?;

        loop {
            match fetch_recommendations(&client, &base_url, &profile, regional).await {
                Ok(response) => {
                    print_recommendations(&response);
                    break;
                }
                Err(e) => {
                    println!("{}", format!("❌ {}", e).bright_red());
                    if !ask_yes_no("Tentar novamente? (s/n): ")? {
                        break;
                    }
                }
            }
        }

        if !ask_yes_no("Responder o questionário de novo? (s/n): ")? {
            println!("{}", "👋 Até logo!".bright_green());
            return Ok(());
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        anyhow::bail!("entrada encerrada");
    }
    Ok(line.trim().to_string())
}

/// Repetir la pregunta hasta que el parser acepte la respuesta
fn ask<T>(label: &str, parse: impl Fn(&str) -> Result<T, String>) -> anyhow::Result<T> {
    loop {
        let answer = prompt(label)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(message) => println!("{}", format!("❌ {}", message).bright_red()),
        }
    }
}

fn ask_yes_no(label: &str) -> anyhow::Result<bool> {
    ask(label, parse_yes_no)
}

fn section(title: &str) {
    println!();
    println!("{}", title.bright_cyan().bold());
}

fn print_menu(options: &[(&str, &str)]) {
    for (index, (_, label)) in options.iter().enumerate() {
        println!("  {}. {}", index + 1, label);
    }
}

fn ask_profile() -> anyhow::Result<Value> {
    section("💰 1/7 Orçamento");
    let (orcamento_min, orcamento_max) = loop {
        let min = ask("Valor mínimo (R$): ", parse_money)?;
        let max = ask("Valor máximo (R$): ", parse_money)?;
        if max > min {
            break (min, max);
        }
        println!("{}", "❌ O valor máximo deve ser maior que o mínimo".bright_red());
    };

    section("📍 2/7 Localização");
    let city = ask("Cidade: ", |s| {
        if s.chars().count() >= 2 {
            Ok(s.to_string())
        } else {
            Err("Informe o nome da cidade".to_string())
        }
    })?;
    let state = ask("Estado (UF): ", parse_uf)?;

    section("🛣️ 3/7 Uso principal");
    print_menu(&USAGES);
    let usage = ask("Opção: ", |s| parse_choice(s, &USAGES))?;

    section("👨‍👩‍👧 4/7 Família");
    let family_size = ask("Quantas pessoas costumam andar no carro? ", |s| {
        s.parse::<u8>()
            .ok()
            .filter(|n| (1..=15).contains(n))
            .ok_or_else(|| "Informe um número entre 1 e 15".to_string())
    })?;
    let children = ask_yes_no("Há crianças? (s/n): ")?;
    let elderly = ask_yes_no("Há idosos? (s/n): ")?;

    section("⭐ 5/7 Prioridades (até 3, separadas por vírgula)");
    print_menu(&PRIORITIES);
    let priorities = ask("Opções: ", parse_priorities)?;

    section("🏷️ 6/7 Preferências (opcional)");
    let brands = parse_list(&prompt("Marcas preferidas: ")?);
    let models = parse_list(&prompt("Modelos preferidos: ")?);
    println!("  0. Sem preferência");
    print_menu(&TRANSMISSIONS);
    let transmission = ask("Câmbio: ", |s| parse_optional_choice(s, &TRANSMISSIONS))?;

    section("💼 7/7 Renda mensal (opcional)");
    println!("  0. Prefiro não informar");
    print_menu(&INCOMES);
    let income = ask("Opção: ", |s| parse_optional_choice(s, &INCOMES))?;

    Ok(build_profile(ProfileAnswers {
        orcamento_min,
        orcamento_max,
        city,
        state,
        usage,
        family_size,
        children,
        elderly,
        priorities,
        brands,
        models,
        transmission,
        income,
    }))
}

struct ProfileAnswers {
    orcamento_min: f64,
    orcamento_max: f64,
    city: String,
    state: String,
    usage: &'static str,
    family_size: u8,
    children: bool,
    elderly: bool,
    priorities: Vec<&'static str>,
    brands: Vec<String>,
    models: Vec<String>,
    transmission: Option<&'static str>,
    income: Option<&'static str>,
}

fn build_profile(answers: ProfileAnswers) -> Value {
    let mut priorities = Map::new();
    for key in &answers.priorities {
        priorities.insert(key.to_string(), json!(5));
    }

    json!({
        "orcamento_min": answers.orcamento_min,
        "orcamento_max": answers.orcamento_max,
        "city": answers.city,
        "state": answers.state,
        "uso_principal": answers.usage,
        "tamanho_familia": answers.family_size,
        "tem_criancas": answers.children,
        "tem_idosos": answers.elderly,
        "prioridades": priorities,
        "marcas_preferidas": answers.brands,
        "modelos_preferidos": answers.models,
        "cambio_preferido": answers.transmission,
        "renda_mensal": answers.income,
    })
}

async fn fetch_recommendations(
    client: &reqwest::Client,
    base_url: &str,
    profile: &Value,
    regional: bool,
) -> anyhow::Result<Value> {
    println!();
    println!("{}", "📤 Enviando perfil...".bright_blue());

    let url = format!("{}/api/recommendations?apenas_regiao={}", base_url, regional);
    let response = client.post(&url).json(profile).send().await?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = body["message"].as_str().unwrap_or("erro desconhecido");
        let details = if body["details"].is_null() {
            String::new()
        } else {
            format!("\n{}", serde_json::to_string_pretty(&body["details"])?)
        };
        anyhow::bail!("Servidor respondeu {}: {}{}", status, message, details);
    }

    Ok(body)
}

fn print_recommendations(response: &Value) {
    let summary = &response["profile_summary"];
    section("📋 Resumo do perfil");
    println!("  Orçamento: {}", summary["budget_range"].as_str().unwrap_or("-"));
    println!("  Local: {}", summary["location"].as_str().unwrap_or("-"));
    println!("  Uso: {}", summary["usage"].as_str().unwrap_or("-"));
    println!(
        "  Carros avaliados: {} (fora do orçamento: {}, fora da região: {})",
        summary["cars_evaluated"], summary["cars_out_of_budget"], summary["cars_outside_region"]
    );

    let recommendations = response["recommendations"].as_array().cloned().unwrap_or_default();
    if recommendations.is_empty() {
        println!();
        println!("{}", "😕 Nenhum carro encontrado".bright_red().bold());
    }

    for recommendation in &recommendations {
        let car = &recommendation["car"];
        let tco = &recommendation["tco"];
        let percentage = recommendation["match_percentage"].as_f64().unwrap_or(0.0);

        println!();
        println!(
            "{} {} {} {} {}",
            format!("#{}", recommendation["ranking"]).bright_white().bold(),
            car["marca"].as_str().unwrap_or(""),
            car["modelo"].as_str().unwrap_or(""),
            car["versao"].as_str().unwrap_or(""),
            car["ano"]
        );
        println!("   {}", colored_percentage(percentage));
        println!("   💵 {}", format_brl(car["preco"].as_f64().unwrap_or(0.0)));
        println!("   💬 {}", recommendation["justification"].as_str().unwrap_or(""));

        let total = tco["total_monthly"].as_f64().unwrap_or(0.0);
        let cap = tco["monthly_budget_cap"].as_f64().unwrap_or(0.0);
        let fits = tco["fits_budget"].as_bool().unwrap_or(false);
        let line = format!("📊 Custo mensal: {} (limite {})", format_brl(total), format_brl(cap));
        if fits {
            println!("   {}", line.bright_green());
        } else {
            println!("   {}", line.bright_red());
        }
        println!(
            "   📍 {} - {}/{}",
            car["concessionaria"]["nome"].as_str().unwrap_or(""),
            car["concessionaria"]["cidade"].as_str().unwrap_or(""),
            car["concessionaria"]["estado"].as_str().unwrap_or("")
        );
    }

    if let Some(suggestions) = response["suggestions"].as_array() {
        if !suggestions.is_empty() {
            section("💡 Sugestões");
            for suggestion in suggestions {
                println!("  - {}", suggestion.as_str().unwrap_or(""));
            }
        }
    }
}

fn colored_percentage(percentage: f64) -> ColoredString {
    let text = format!("{:.1}% de compatibilidade", percentage);
    if percentage >= 80.0 {
        text.bright_green().bold()
    } else if percentage >= 60.0 {
        text.bright_yellow()
    } else {
        text.normal()
    }
}

/// Acepta "80000", "80.000", "R$ 80.000,50"
fn parse_money(input: &str) -> Result<f64, String> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| *value >= 0.0)
        .ok_or_else(|| format!("Valor inválido: '{}'", input))
}

fn parse_uf(input: &str) -> Result<String, String> {
    let uf = input.trim();
    if uf.len() == 2 && uf.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(uf.to_uppercase())
    } else {
        Err("Use a sigla de 2 letras, ex: SP".to_string())
    }
}

fn parse_yes_no(input: &str) -> Result<bool, String> {
    match input.trim().to_lowercase().as_str() {
        "s" | "sim" | "y" => Ok(true),
        "n" | "nao" | "não" => Ok(false),
        _ => Err("Responda s ou n".to_string()),
    }
}

fn parse_choice(input: &str, options: &[(&'static str, &str)]) -> Result<&'static str, String> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| options.get(index))
        .map(|(key, _)| *key)
        .ok_or_else(|| format!("Escolha uma opção entre 1 e {}", options.len()))
}

fn parse_optional_choice(
    input: &str,
    options: &[(&'static str, &str)],
) -> Result<Option<&'static str>, String> {
    match input.trim() {
        "" | "0" => Ok(None),
        other => parse_choice(other, options).map(Some),
    }
}

fn parse_priorities(input: &str) -> Result<Vec<&'static str>, String> {
    let mut selected = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let key = parse_choice(part, &PRIORITIES)?;
        if !selected.contains(&key) {
            selected.push(key);
        }
    }

    if selected.len() > MAX_PRIORITIES {
        return Err(format!("Escolha no máximo {} prioridades", MAX_PRIORITIES));
    }
    Ok(selected)
}

fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::new();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("80000"), Ok(80000.0));
        assert_eq!(parse_money("80.000"), Ok(80000.0));
        assert_eq!(parse_money("R$ 84.990,50"), Ok(84990.5));
        assert!(parse_money("muito").is_err());
        assert!(parse_money("-10").is_err());
    }

    #[test]
    fn test_parse_priorities() {
        assert_eq!(parse_priorities("1, 2,5"), Ok(vec!["economia", "espaco", "seguranca"]));
        assert_eq!(parse_priorities("1,1"), Ok(vec!["economia"]));
        assert_eq!(parse_priorities(""), Ok(vec![]));
        assert!(parse_priorities("1,2,3,4").is_err());
        assert!(parse_priorities("9").is_err());
    }

    #[test]
    fn test_optional_choice() {
        assert_eq!(parse_optional_choice("", &TRANSMISSIONS), Ok(None));
        assert_eq!(parse_optional_choice("2", &TRANSMISSIONS), Ok(Some("automatico")));
        assert!(parse_optional_choice("7", &INCOMES).is_err());
    }

    #[test]
    fn test_build_profile() {
        let profile = build_profile(ProfileAnswers {
            orcamento_min: 50000.0,
            orcamento_max: 80000.0,
            city: "Curitiba".to_string(),
            state: "PR".to_string(),
            usage: "familia",
            family_size: 4,
            children: true,
            elderly: false,
            priorities: vec!["seguranca", "espaco"],
            brands: vec!["Toyota".to_string()],
            models: vec![],
            transmission: None,
            income: Some("5000_8000"),
        });

        assert_eq!(profile["prioridades"]["seguranca"], 5);
        assert!(profile["prioridades"].get("economia").is_none());
        assert_eq!(profile["cambio_preferido"], Value::Null);
        assert_eq!(profile["renda_mensal"], "5000_8000");
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(84990.0), "R$ 84.990,00");
        assert_eq!(format_brl(1512.437), "R$ 1.512,44");
        assert_eq!(format_brl(999.0), "R$ 999,00");
    }
}
