//! Planity step vocabulary
//!
//! Each step maps one line of the feature file to page-object calls and
//! reports what it observed; [`ScenarioRunner::execute_step`] records it.

use super::error::ScenarioError;
use super::runner::ScenarioRunner;
use crate::pages::PlanityPage;

pub struct PlanitySteps;

impl PlanitySteps {
    /// `Je clique sur le lien {string} dans le menu`
    pub async fn click_menu_link(
        runner: &mut ScenarioRunner,
        link: &str,
    ) -> Result<(), ScenarioError> {
        let link = link.to_string();
        runner
            .execute_step(
                &format!("Clic sur le lien {} dans le menu", link),
                "Le lien du menu doit être cliqué",
                |ctx| async move {
                    let page = PlanityPage::new(ctx);
                    match link.as_str() {
                        "Coiffeur" => page.click_hairdresser_link().await?,
                        other => {
                            return Err(ScenarioError::UnknownElement(format!(
                                "menu link '{}'",
                                other
                            )))
                        }
                    }
                    Ok::<_, ScenarioError>(format!("Clic effectué sur le lien {}", link))
                },
            )
            .await?;
        Ok(())
    }

    /// `Je saisis {string} dans la recherche`
    pub async fn enter_location(
        runner: &mut ScenarioRunner,
        location: &str,
    ) -> Result<(), ScenarioError> {
        let location = location.to_string();
        runner
            .execute_step(
                "Saisie de la localisation",
                "Le champ de recherche doit être rempli",
                |ctx| async move {
                    PlanityPage::new(ctx).enter_location(&location).await?;
                    Ok::<_, ScenarioError>(format!("Localisation saisie: {}", location))
                },
            )
            .await?;
        Ok(())
    }

    /// `Je clique sur le bouton {string}`
    pub async fn click_button(
        runner: &mut ScenarioRunner,
        button: &str,
    ) -> Result<(), ScenarioError> {
        let button = button.to_string();
        runner
            .execute_step(
                &format!("Clic sur le bouton {}", button),
                "Le bouton doit être cliqué",
                |ctx| async move {
                    let page = PlanityPage::new(ctx);
                    match button.as_str() {
                        "Rechercher" => page.click_search().await?,
                        other => {
                            return Err(ScenarioError::UnknownElement(format!(
                                "button '{}'",
                                other
                            )))
                        }
                    }
                    Ok::<_, ScenarioError>(format!("Clic effectué sur le bouton {}", button))
                },
            )
            .await?;
        Ok(())
    }

    /// `Je devrais voir une liste de coiffeurs à {city}`
    ///
    /// Opens the first hairdresser link once the list is confirmed.
    pub async fn should_see_hairdressers(
        runner: &mut ScenarioRunner,
        city: &str,
    ) -> Result<(), ScenarioError> {
        let city = city.to_string();
        runner
            .execute_step(
                "Vérification des résultats de recherche",
                "La liste des coiffeurs doit être affichée",
                |ctx| async move {
                    let page = PlanityPage::new(ctx);
                    if !page.hairdresser_results_displayed(&city).await {
                        return Err(ScenarioError::AssertionFailed(
                            "La liste des coiffeurs n'est pas affichée".to_string(),
                        ));
                    }
                    page.click_hairdresser_city_link().await?;
                    Ok::<_, ScenarioError>("Liste des coiffeurs affichée avec succès".to_string())
                },
            )
            .await?;
        Ok(())
    }

    /// The whole hairdresser search scenario
    pub async fn hairdresser_search(
        runner: &mut ScenarioRunner,
        city: &str,
    ) -> Result<(), ScenarioError> {
        runner.launch_app().await?;
        Self::click_menu_link(runner, "Coiffeur").await?;
        Self::enter_location(runner, city).await?;
        Self::click_button(runner, "Rechercher").await?;
        Self::should_see_hairdressers(runner, city).await
    }
}
